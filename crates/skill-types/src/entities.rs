//! # Request Entities
//!
//! The inbound webhook envelope as the voice platform sends it.
//!
//! ## Clusters
//!
//! - **Envelope**: `RequestEnvelope`, `Session`, `Context`
//! - **Identity**: `Application`, `User`
//! - **Inner requests**: `BaseRequest`, `LaunchRequest`, `IntentRequest`, `SessionEndedRequest`
//!
//! The inner `request` member stays an opaque JSON value until the dispatcher
//! decodes it by its `type` discriminator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EnvelopeError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// The skill the platform believes it is talking to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Application {
    #[serde(rename = "applicationId", default)]
    pub application_id: String,
}

/// The end user behind the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    /// Present only when account linking is configured.
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

// =============================================================================
// CLUSTER B: THE ENVELOPE
// =============================================================================

/// Conversation state carried between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Session {
    pub new: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub application: Application,
    pub attributes: HashMap<String, Value>,
    pub user: User,
}

/// Device and system state attached to the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Context {
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemContext {
    pub application: Application,
    pub user: User,
    pub device: HashMap<String, Value>,
}

/// The top-level webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub context: Context,
    /// Type-discriminated inner request, decoded lazily.
    pub request: Value,
}

impl RequestEnvelope {
    /// Decode the common header shared by every inner request type.
    pub fn base_request(&self) -> Result<BaseRequest, EnvelopeError> {
        BaseRequest::deserialize(&self.request)
            .map_err(|e| EnvelopeError::InvalidRequest(e.to_string()))
    }

    /// Application identifier the request claims to target.
    ///
    /// The session block is authoritative; requests without a session (for
    /// example from out-of-session events) fall back to `context.System`.
    pub fn application_id(&self) -> &str {
        if !self.session.application.application_id.is_empty() {
            return &self.session.application.application_id;
        }
        self.context
            .system
            .as_ref()
            .map(|system| system.application.application_id.as_str())
            .unwrap_or_default()
    }
}

// =============================================================================
// CLUSTER C: INNER REQUESTS
// =============================================================================

/// Fields common to every inner request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BaseRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(rename = "requestId", default)]
    pub request_id: String,
    /// RFC 3339 timestamp set by the platform when the request was sent.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub locale: String,
}

/// Sent when the user opens the skill without a specific intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LaunchRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntentSlot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Intent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, IntentSlot>,
}

impl Intent {
    /// Value of the named slot, if the user filled it.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .map(|slot| slot.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// Sent when the utterance resolved to one of the skill's intents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IntentRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    #[serde(default)]
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionEndedError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// Sent when the platform closes the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionEndedRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionEndedError>,
}
