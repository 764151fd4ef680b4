//! Skill Gateway - HTTP webhook endpoint for voice-assistant skills.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     SKILL GATEWAY                         │
//! ├──────────────────────────────────────────────────────────┤
//! │   POST {path}        GET /health        GET /metrics      │
//! │        │                                                  │
//! │  ┌─────┴──────────────────────────────┐                   │
//! │  │  Tracing → Timeout → BodyLimit     │                   │
//! │  └─────┬──────────────────────────────┘                   │
//! │        │                                                  │
//! │  decode envelope ──► RequestVerificationApi::verify       │
//! │        │                                                  │
//! │  SkillRequest::decode ──► SkillHandler callback           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Responses
//!
//! - undecodable envelope or inner request: 400 `Invalid request format`
//! - failed authentication: 400 `Request signature error`
//! - callback returned a response: 200 with the response envelope
//! - callback failed: 500 `Internal Server Error`
//! - no callback output or unknown type: 200 `{"status":"OK"}`
//!
//! # Usage
//!
//! ```ignore
//! use skill_gateway::{GatewayConfig, SkillGatewayService};
//!
//! let mut config = GatewayConfig::default();
//! config.verification.application_id = "amzn1.ask.skill.example".into();
//! let gateway = SkillGatewayService::from_config(config, Arc::new(MySkill))?;
//! gateway.run(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod dispatch;
pub mod domain;
pub mod middleware;
pub mod service;

// Re-exports for public API
pub use dispatch::{dispatch, HandlerError, HandlerResult, SkillHandler, SkillRequest};
pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use middleware::GatewayMetrics;
pub use service::SkillGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
