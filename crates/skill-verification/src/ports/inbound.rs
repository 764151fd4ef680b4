//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the verification subsystem.

use std::sync::Arc;

use crate::domain::entities::{CacheSnapshot, SigningCertificate, VerificationRequest};
use crate::domain::errors::VerificationError;

/// Primary Request Verification API.
///
/// Implementations must be thread-safe (`Send + Sync`); one instance serves
/// every request of the process.
#[async_trait::async_trait]
pub trait RequestVerificationApi: Send + Sync {
    /// Authenticate one inbound request.
    ///
    /// Succeeds without any check when verification is disabled. Otherwise
    /// runs header presence, certificate resolution, signature, timestamp and
    /// application checks in that order and returns the first failure.
    async fn verify(&self, request: &VerificationRequest<'_>) -> Result<(), VerificationError>;

    /// Return the validated signing certificate for a chain URL, fetching and
    /// validating it on a cache miss.
    async fn resolve_certificate(
        &self,
        url: &str,
    ) -> Result<Arc<SigningCertificate>, VerificationError>;

    fn is_enabled(&self) -> bool;

    /// Certificate cache counters.
    fn cache_snapshot(&self) -> CacheSnapshot;

    /// Drop a cached certificate so the next request re-validates it.
    fn invalidate_certificate(&self, url: &str) -> bool;
}
