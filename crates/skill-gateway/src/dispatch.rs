//! Typed dispatch of verified requests to skill callbacks.
//!
//! The inner request is decoded by its lower-cased `type` tag. Unknown tags
//! are not errors: the platform adds request types over time and a skill that
//! does not handle one simply acknowledges it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use skill_types::{
    BaseRequest, EnvelopeError, IntentRequest, LaunchRequest, RequestEnvelope, ResponseEnvelope,
    SessionEndedRequest,
};

/// Request type tags, lower-cased.
pub mod tags {
    pub const LAUNCH: &str = "launchrequest";
    pub const INTENT: &str = "intentrequest";
    pub const SESSION_ENDED: &str = "sessionendedrequest";
}

/// A decoded inner request.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillRequest {
    Launch(LaunchRequest),
    Intent(IntentRequest),
    SessionEnded(SessionEndedRequest),
    /// Carries the original `type` string.
    Unknown(String),
}

impl SkillRequest {
    /// Decode `request` according to the type named in `base`.
    pub fn decode(request: &Value, base: &BaseRequest) -> Result<Self, EnvelopeError> {
        let invalid = |e: serde_json::Error| EnvelopeError::InvalidRequest(e.to_string());

        match base.request_type.to_lowercase().as_str() {
            tags::LAUNCH => LaunchRequest::deserialize(request)
                .map(SkillRequest::Launch)
                .map_err(invalid),
            tags::INTENT => IntentRequest::deserialize(request)
                .map(SkillRequest::Intent)
                .map_err(invalid),
            tags::SESSION_ENDED => SessionEndedRequest::deserialize(request)
                .map(SkillRequest::SessionEnded)
                .map_err(invalid),
            _ => Ok(SkillRequest::Unknown(base.request_type.clone())),
        }
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SkillRequest::Launch(_) => "launch",
            SkillRequest::Intent(_) => "intent",
            SkillRequest::SessionEnded(_) => "session_ended",
            SkillRequest::Unknown(_) => "unknown",
        }
    }
}

/// Error returned by a skill callback; rendered as a 500.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// `Ok(None)` means "nothing to say" and is acknowledged with `{"status":"OK"}`.
pub type HandlerResult = Result<Option<ResponseEnvelope>, HandlerError>;

/// Callbacks a skill implements. Every method defaults to `Ok(None)`.
#[async_trait]
pub trait SkillHandler: Send + Sync {
    async fn on_launch(
        &self,
        _envelope: &RequestEnvelope,
        _request: &LaunchRequest,
    ) -> HandlerResult {
        Ok(None)
    }

    async fn on_intent(
        &self,
        _envelope: &RequestEnvelope,
        _request: &IntentRequest,
    ) -> HandlerResult {
        Ok(None)
    }

    async fn on_session_ended(
        &self,
        _envelope: &RequestEnvelope,
        _request: &SessionEndedRequest,
    ) -> HandlerResult {
        Ok(None)
    }
}

/// Invoke the callback matching `request`.
pub async fn dispatch(
    handler: &dyn SkillHandler,
    envelope: &RequestEnvelope,
    request: &SkillRequest,
) -> HandlerResult {
    match request {
        SkillRequest::Launch(launch) => handler.on_launch(envelope, launch).await,
        SkillRequest::Intent(intent) => handler.on_intent(envelope, intent).await,
        SkillRequest::SessionEnded(ended) => handler.on_session_ended(envelope, ended).await,
        SkillRequest::Unknown(_) => Ok(None),
    }
}
