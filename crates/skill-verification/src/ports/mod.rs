//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the HTTP layer calls per request
//! - **Outbound (Driven)**: Retrieval of certificate chains

pub mod inbound;
pub mod outbound;
