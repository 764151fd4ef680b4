//! # Skill Types Crate
//!
//! Wire schema for the voice-platform webhook: the request envelope the
//! platform POSTs and the response envelope a skill answers with.
//!
//! ## Design Principles
//!
//! - **Lazy inner request**: `RequestEnvelope::request` stays raw JSON until
//!   its `type` discriminator has been inspected.
//! - **Tolerant decoding**: absent optional members default instead of
//!   failing, so new platform fields never break older skills.

pub mod entities;
pub mod errors;
pub mod response;

pub use entities::*;
pub use errors::*;
pub use response::*;

/// Decode a raw webhook body into a request envelope.
pub fn parse_envelope(body: &[u8]) -> Result<RequestEnvelope, EnvelopeError> {
    Ok(serde_json::from_slice(body)?)
}
