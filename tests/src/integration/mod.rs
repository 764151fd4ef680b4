//! End-to-end flows across verification, dispatch and the HTTP layer.
//!
//! Certificates are generated at test time; no network access is needed.

pub mod server;
pub mod webhook_flows;
