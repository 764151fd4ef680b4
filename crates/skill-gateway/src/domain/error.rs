//! Gateway error types and their HTTP rendering.
//!
//! Every non-skill response body has the shape
//! `{"status": "<label>", "message": "<text>"}`; the platform only looks at
//! the status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status labels used in JSON bodies
pub mod labels {
    pub const OK: &str = "OK";
    pub const BAD_REQUEST: &str = "BadRequest";
    pub const SERVER_ERROR: &str = "ServerError";
}

/// Fixed messages, deliberately free of failure detail.
pub mod messages {
    pub const INVALID_FORMAT: &str = "Invalid request format";
    pub const SIGNATURE_ERROR: &str = "Request signature error";
    pub const INTERNAL: &str = "Internal Server Error";
    pub const TIMEOUT: &str = "Request timed out";
}

/// JSON status body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API error with HTTP status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Label in the JSON body
    pub label: &'static str,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, label: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            label,
            message: message.into(),
        }
    }

    /// Envelope or inner request could not be decoded
    pub fn invalid_format() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            labels::BAD_REQUEST,
            messages::INVALID_FORMAT,
        )
    }

    /// Request failed authentication
    pub fn signature_error() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            labels::BAD_REQUEST,
            messages::SIGNATURE_ERROR,
        )
    }

    /// Skill handler failed
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            labels::SERVER_ERROR,
            messages::INTERNAL,
        )
    }

    /// Request exceeded the gateway deadline
    pub fn timeout() -> Self {
        Self::new(
            StatusCode::REQUEST_TIMEOUT,
            labels::SERVER_ERROR,
            messages::TIMEOUT,
        )
    }

    pub fn body(&self) -> StatusBody {
        StatusBody {
            status: self.label.to_string(),
            message: Some(self.message.clone()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

impl From<skill_verification::VerificationError> for ApiError {
    fn from(e: skill_verification::VerificationError) -> Self {
        match e {
            skill_verification::VerificationError::MalformedEnvelope(_) => {
                ApiError::invalid_format()
            }
            _ => ApiError::signature_error(),
        }
    }
}

/// `200 {"status":"OK"}`, sent when no handler produced a response.
pub fn ok_response() -> Response {
    (
        StatusCode::OK,
        Json(StatusBody {
            status: labels::OK.to_string(),
            message: None,
        }),
    )
        .into_response()
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),

    /// Certificate fetcher could not be built
    #[error("fetcher error: {0}")]
    Fetcher(#[from] skill_verification::FetchError),
}
