//! # Domain Entities
//!
//! Core data structures for request authentication.

use std::time::Duration;

use rustls_pki_types::CertificateDer;

// =============================================================================
// Trust policy constants
// =============================================================================

/// Only scheme accepted for the certificate chain URL.
pub const TRUSTED_SCHEME: &str = "https";

/// Host the platform publishes its signing chains on (compared case-insensitively).
pub const TRUSTED_HOST: &str = "s3.amazonaws.com";

/// Explicit port, if present, must be this one.
pub const TRUSTED_PORT: &str = "443";

/// Literal, case-sensitive path prefix of every chain URL.
pub const TRUSTED_PATH_PREFIX: &str = "/echo.api/";

/// DNS name the leaf certificate must be valid for.
pub const SIGNER_DNS_NAME: &str = "echo-api.amazon.com";

/// Maximum allowed skew between the request timestamp and now.
pub const DEFAULT_TIMESTAMP_TOLERANCE: Duration = Duration::from_secs(150);

/// Header carrying the certificate chain URL.
pub const CERT_CHAIN_URL_HEADER: &str = "SignatureCertChainUrl";

/// Header carrying the base64 request signature.
pub const SIGNATURE_HEADER: &str = "Signature";

// =============================================================================
// Certificates
// =============================================================================

/// A leaf certificate that passed URL policy, chain validation and the
/// signer name check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningCertificate {
    der: CertificateDer<'static>,
}

impl SigningCertificate {
    pub(crate) fn new(der: CertificateDer<'static>) -> Self {
        Self { der }
    }

    pub fn der(&self) -> &[u8] {
        self.der.as_ref()
    }
}

/// PEM material decomposed into its roles.
#[derive(Clone, Debug)]
pub struct CertificateChain {
    pub leaf: CertificateDer<'static>,
    /// In PEM order.
    pub intermediates: Vec<CertificateDer<'static>>,
    /// The self-signed certificate (SKI equals AKI).
    pub root: CertificateDer<'static>,
}

// =============================================================================
// Requests
// =============================================================================

/// Everything the verifier needs from one inbound webhook call.
///
/// Borrowed from the HTTP layer; the body is the exact bytes received.
#[derive(Clone, Copy, Debug)]
pub struct VerificationRequest<'a> {
    /// Value of the `SignatureCertChainUrl` header.
    pub cert_chain_url: Option<&'a str>,
    /// Value of the `Signature` header.
    pub signature: Option<&'a str>,
    pub body: &'a [u8],
    /// RFC 3339 timestamp from the inner request.
    pub timestamp: &'a str,
    /// `session.application.applicationId` from the envelope.
    pub application_id: &'a str,
}

// =============================================================================
// Configuration
// =============================================================================

/// Settings for the verification service.
#[derive(Clone, Debug)]
pub struct VerificationConfig {
    /// When false, `verify` accepts every request without checks.
    pub enabled: bool,
    /// Application ID requests must target.
    pub application_id: String,
    pub timestamp_tolerance: Duration,
    /// Cached certificates older than this are re-fetched. `None` keeps them forever.
    pub cert_cache_ttl: Option<Duration>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            application_id: String::new(),
            timestamp_tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
            cert_cache_ttl: None,
        }
    }
}

impl VerificationConfig {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            ..Default::default()
        }
    }

    /// Configuration that skips every check.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Point-in-time view of the certificate store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}
