//! # Webhook Flows
//!
//! Signed requests driven through the complete router: envelope decoding,
//! request authentication against a generated signer chain, typed dispatch
//! and response rendering.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use skill_gateway::{
        GatewayConfig, HandlerError, HandlerResult, SkillGatewayService, SkillHandler,
    };
    use skill_runtime::EchoSkill;
    use skill_types::{IntentRequest, RequestEnvelope, ResponseEnvelope};
    use skill_verification::test_helpers::{
        now_timestamp, sign_body, valid_chain_pem, StaticFetcher, TEST_APPLICATION_ID,
        TEST_CHAIN_URL,
    };
    use skill_verification::{
        RequestVerificationService, VerificationConfig, CERT_CHAIN_URL_HEADER, SIGNATURE_HEADER,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Counts intent callbacks; optionally fails them.
    #[derive(Default)]
    struct RecordingSkill {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingSkill {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SkillHandler for RecordingSkill {
        async fn on_intent(
            &self,
            _envelope: &RequestEnvelope,
            request: &IntentRequest,
        ) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(HandlerError::failed("backend unavailable"));
            }
            Ok(Some(ResponseEnvelope::speak(request.intent.name.clone())))
        }
    }

    struct Harness {
        router: Router,
        fetcher: StaticFetcher,
        gateway: Arc<SkillGatewayService>,
    }

    fn harness(handler: Arc<dyn SkillHandler>, verify: bool) -> Harness {
        let fetcher = StaticFetcher::new(valid_chain_pem());
        let verification = if verify {
            VerificationConfig::new(TEST_APPLICATION_ID)
        } else {
            VerificationConfig::disabled()
        };
        let verifier = Arc::new(RequestVerificationService::new(
            verification,
            fetcher.clone(),
        ));

        let mut config = GatewayConfig::default();
        config.verification.enabled = verify;
        config.verification.application_id = TEST_APPLICATION_ID.to_string();

        let gateway = Arc::new(SkillGatewayService::new(config, verifier, handler).unwrap());
        Harness {
            router: gateway.router(),
            fetcher,
            gateway,
        }
    }

    fn envelope(request: Value) -> Vec<u8> {
        json!({
            "version": "1.0",
            "session": {
                "new": true,
                "sessionId": "amzn1.echo-api.session.test",
                "application": { "applicationId": TEST_APPLICATION_ID },
                "user": { "userId": "amzn1.ask.account.test" }
            },
            "request": request
        })
        .to_string()
        .into_bytes()
    }

    fn intent_body(name: &str) -> Vec<u8> {
        envelope(json!({
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.1",
            "timestamp": now_timestamp(chrono::Duration::zero()),
            "locale": "en-US",
            "intent": {
                "name": name,
                "slots": { "phrase": { "name": "phrase", "value": "hello there" } }
            }
        }))
    }

    fn signed(body: Vec<u8>) -> Request<Body> {
        let signature = sign_body(&body);
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header(CERT_CHAIN_URL_HEADER, TEST_CHAIN_URL)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // =============================================================================
    // ACCEPTED REQUESTS
    // =============================================================================

    #[tokio::test]
    async fn test_signed_intent_reaches_handler() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);

        let response = h
            .router
            .oneshot(signed(intent_body("OrderPizza")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["response"]["outputSpeech"]["text"], "OrderPizza");
        assert_eq!(skill.calls(), 1);
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_echo_skill_end_to_end() {
        let h = harness(Arc::new(EchoSkill), true);

        let response = h
            .router
            .oneshot(signed(intent_body("EchoIntent")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["response"]["outputSpeech"]["text"], "hello there");
        assert_eq!(json["response"]["shouldEndSession"], false);
    }

    #[tokio::test]
    async fn test_signing_chain_fetched_once() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);

        for _ in 0..3 {
            let response = h
                .router
                .clone()
                .oneshot(signed(intent_body("Repeat")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(skill.calls(), 3);
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_type_acknowledged() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);
        let body = envelope(json!({
            "type": "AudioPlayer.PlaybackStarted",
            "requestId": "amzn1.echo-api.request.2",
            "timestamp": now_timestamp(chrono::Duration::zero()),
        }));

        let response = h.router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"status": "OK"}));
        assert_eq!(skill.calls(), 0);
    }

    #[tokio::test]
    async fn test_type_without_callback_acknowledged() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);
        let body = envelope(json!({
            "type": "SessionEndedRequest",
            "requestId": "amzn1.echo-api.request.3",
            "timestamp": now_timestamp(chrono::Duration::zero()),
            "reason": "USER_INITIATED"
        }));

        let response = h.router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn test_disabled_verification_accepts_unsigned() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), false);
        let body = envelope(json!({
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.4",
            "timestamp": "2001-01-01T00:00:00Z",
            "intent": { "name": "Anything" }
        }));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(skill.calls(), 1);
        assert_eq!(h.fetcher.calls(), 0);
    }

    // =============================================================================
    // REJECTED REQUESTS
    // =============================================================================

    #[tokio::test]
    async fn test_bad_signature_rejected_before_handler() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);

        let body = intent_body("OrderPizza");
        let signature = sign_body(b"some other body");
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CERT_CHAIN_URL_HEADER, TEST_CHAIN_URL)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap();

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"status": "BadRequest", "message": "Request signature error"})
        );
        assert_eq!(skill.calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_request_rejected() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);
        let body = envelope(json!({
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.5",
            "timestamp": now_timestamp(chrono::Duration::seconds(-300)),
            "intent": { "name": "Replay" }
        }));

        let response = h.router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(skill.calls(), 0);
        let metrics = h.gateway.metrics();
        assert_eq!(metrics.rejected_freshness.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_foreign_application_rejected() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);
        let body = json!({
            "version": "1.0",
            "session": { "application": { "applicationId": "amzn1.ask.skill.someone-else" } },
            "request": {
                "type": "IntentRequest",
                "requestId": "amzn1.echo-api.request.6",
                "timestamp": now_timestamp(chrono::Duration::zero()),
                "intent": { "name": "Hijack" }
            }
        })
        .to_string()
        .into_bytes();

        let response = h.router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(skill.calls(), 0);
        assert_eq!(
            h.gateway
                .metrics()
                .rejected_application
                .load(Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn test_untrusted_chain_url_never_fetched() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);

        let body = intent_body("OrderPizza");
        let signature = sign_body(&body);
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                CERT_CHAIN_URL_HEADER,
                "https://s3.amazonaws.com/not.echo.api/cert.pem",
            )
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap();

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.fetcher.calls(), 0);
        assert_eq!(skill.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);

        let response = h
            .router
            .oneshot(signed(b"{\"version\": ".to_vec()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"status": "BadRequest", "message": "Invalid request format"})
        );
        assert_eq!(h.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_intent_rejected_after_verification() {
        let skill = Arc::new(RecordingSkill::default());
        let h = harness(skill.clone(), true);
        let body = envelope(json!({
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.7",
            "timestamp": now_timestamp(chrono::Duration::zero()),
            "intent": { "name": ["not", "a", "string"] }
        }));

        let response = h.router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["message"],
            "Invalid request format"
        );
        assert_eq!(skill.calls(), 0);
    }

    // =============================================================================
    // HANDLER FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_handler_error_is_server_error() {
        let skill = Arc::new(RecordingSkill::failing());
        let h = harness(skill.clone(), true);

        let response = h
            .router
            .oneshot(signed(intent_body("OrderPizza")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert_eq!(
            json,
            json!({"status": "ServerError", "message": "Internal Server Error"})
        );
        assert!(!json.to_string().contains("backend unavailable"));
        assert_eq!(skill.calls(), 1);
        assert_eq!(
            h.gateway.metrics().handler_errors.load(Ordering::Relaxed),
            1
        );
    }
}
