//! Middleware stack for the skill gateway.
//!
//! Layer order: Request → Tracing → Timeout → BodyLimit → Handler

pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use metrics::{GatewayMetrics, RequestTimer};
pub use timeout::TimeoutLayer;
pub use tracing::TracingLayer;
