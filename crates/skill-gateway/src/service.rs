//! Skill gateway service: the webhook router and its server loop.
//!
//! Webhook pipeline: decode envelope → authenticate → decode typed request →
//! skill callback → JSON response.

use crate::dispatch::{dispatch, SkillHandler, SkillRequest};
use crate::domain::config::{GatewayConfig, HEALTH_PATH, METRICS_PATH};
use crate::domain::error::{ok_response, ApiError, ApiResult, GatewayError};
use crate::middleware::{GatewayMetrics, RequestTimer, TimeoutLayer, TracingLayer};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use skill_types::parse_envelope;
use skill_verification::{
    HttpCertificateFetcher, RequestVerificationApi, RequestVerificationService,
    VerificationError, VerificationRequest, CERT_CHAIN_URL_HEADER, SIGNATURE_HEADER,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, error, info, Span};

/// Skill gateway service state
pub struct SkillGatewayService {
    config: GatewayConfig,
    verifier: Arc<dyn RequestVerificationApi>,
    handler: Arc<dyn SkillHandler>,
    metrics: Arc<GatewayMetrics>,
}

impl SkillGatewayService {
    /// Create a gateway around an existing verifier.
    ///
    /// The verifier carries its own settings, so `config.verification` is
    /// not validated here; only `verification.enabled` is overwritten to
    /// match the verifier. Use [`Self::from_config`] to build the verifier
    /// from `config`.
    pub fn new(
        mut config: GatewayConfig,
        verifier: Arc<dyn RequestVerificationApi>,
        handler: Arc<dyn SkillHandler>,
    ) -> Result<Self, GatewayError> {
        config.validate_server()?;
        config.verification.enabled = verifier.is_enabled();

        Ok(Self {
            config,
            verifier,
            handler,
            metrics: Arc::new(GatewayMetrics::new()),
        })
    }

    /// Create a gateway that fetches signing chains over HTTPS.
    pub fn from_config(
        config: GatewayConfig,
        handler: Arc<dyn SkillHandler>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let fetcher = HttpCertificateFetcher::new(config.to_fetcher_config())?;
        let verifier = Arc::new(RequestVerificationService::new(
            config.to_verification_config(),
            fetcher,
        ));

        Self::new(config, verifier, handler)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            verifier: Arc::clone(&self.verifier),
            handler: Arc::clone(&self.handler),
            metrics: Arc::clone(&self.metrics),
        };

        let middleware = ServiceBuilder::new()
            .layer(TracingLayer::new())
            .layer(TimeoutLayer::new(self.config.timeouts.request));

        Router::new()
            .route(&self.config.http.path, post(handle_webhook))
            .route(HEALTH_PATH, get(health_check))
            .route(METRICS_PATH, get(metrics_snapshot))
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_body_size))
            .layer(DefaultBodyLimit::disable())
            .layer(middleware)
            .with_state(state)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(
            addr = %local,
            path = %self.config.http.path,
            verification = self.verifier.is_enabled(),
            "Skill gateway listening"
        );

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        if let Err(e) = result {
            error!(error = %e, "Skill gateway server error");
            return Err(GatewayError::Serve(e.to_string()));
        }

        info!("Skill gateway stopped");
        Ok(())
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    verifier: Arc<dyn RequestVerificationApi>,
    handler: Arc<dyn SkillHandler>,
    metrics: Arc<GatewayMetrics>,
}

async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let timer = RequestTimer::new(Arc::clone(&state.metrics));

    let response = match process_webhook(&state, &headers, &body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };

    timer.finish(response.status().is_success());
    response
}

async fn process_webhook(state: &AppState, headers: &HeaderMap, body: &[u8]) -> ApiResult<Response> {
    let envelope = parse_envelope(body).map_err(|e| {
        debug!(error = %e, "Undecodable request envelope");
        reject_malformed(state, e)
    })?;

    let base = envelope.base_request().map_err(|e| {
        debug!(error = %e, "Undecodable inner request");
        reject_malformed(state, e)
    })?;

    let span = Span::current();
    span.record("request_type", base.request_type.as_str());
    span.record("request_id", base.request_id.as_str());

    let verification = VerificationRequest {
        cert_chain_url: header_value(headers, CERT_CHAIN_URL_HEADER),
        signature: header_value(headers, SIGNATURE_HEADER),
        body,
        timestamp: &base.timestamp,
        application_id: envelope.application_id(),
    };
    state.verifier.verify(&verification).await.map_err(|e| {
        state.metrics.record_rejection(&e);
        ApiError::from(e)
    })?;

    let request = SkillRequest::decode(&envelope.request, &base).map_err(|e| {
        debug!(error = %e, request_type = %base.request_type, "Undecodable typed request");
        reject_malformed(state, e)
    })?;
    state.metrics.record_dispatch(&request);

    match dispatch(state.handler.as_ref(), &envelope, &request).await {
        Ok(Some(response)) => Ok(Json(response).into_response()),
        Ok(None) => Ok(ok_response()),
        Err(e) => {
            error!(error = %e, kind = request.kind(), "Skill handler failed");
            state.metrics.record_handler_error();
            Err(ApiError::internal())
        }
    }
}

fn reject_malformed(state: &AppState, cause: impl std::fmt::Display) -> ApiError {
    let error = VerificationError::MalformedEnvelope(cause.to_string());
    state.metrics.record_rejection(&error);
    ApiError::from(error)
}

/// Header as text; absent and non-ASCII values are both treated as missing.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json(state.verifier.cache_snapshot()))
}
