//! Domain types for the skill gateway: configuration and error rendering.

pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::{
    GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig, VerificationSettings,
};
pub use error::{ok_response, ApiError, ApiResult, GatewayError, StatusBody};
