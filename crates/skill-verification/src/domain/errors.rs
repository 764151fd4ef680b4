//! # Verification Errors
//!
//! One variant per way an inbound request can fail authentication. The
//! orchestrator returns the first failure unchanged.

use thiserror::Error;

/// Errors that can occur while authenticating a webhook request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    // =========================================================================
    // Signer URL policy
    // =========================================================================
    /// The certificate chain URL does not parse.
    #[error("Invalid certificate chain URL: {0}")]
    InvalidUrl(String),

    #[error("Untrusted certificate chain URL scheme")]
    UntrustedScheme,

    #[error("Untrusted certificate chain URL host")]
    UntrustedHost,

    #[error("Untrusted certificate chain URL port")]
    UntrustedPort,

    /// The authority has more than one `:` separator.
    #[error("Invalid certificate chain URL host format")]
    InvalidHostFormat,

    #[error("Untrusted certificate chain URL path")]
    UntrustedPath,

    // =========================================================================
    // Chain retrieval and validation
    // =========================================================================
    /// Transport failure, non-2xx status, or an oversized chain.
    #[error("Failed to fetch certificate chain: {0}")]
    FetchError(String),

    /// No parsable leaf or no self-signed root in the PEM material.
    #[error("Incomplete certificate chain")]
    IncompleteChain,

    #[error("Certificate chain verification failed: {0}")]
    ChainVerificationFailed(String),

    /// The leaf is not valid for the expected signer DNS name.
    #[error("Signing certificate hostname mismatch")]
    HostnameMismatch,

    // =========================================================================
    // Signature
    // =========================================================================
    /// Carries the header name.
    #[error("Missing request header: {0}")]
    MissingHeader(&'static str),

    #[error("Signature is not valid base64")]
    InvalidEncoding,

    #[error("Request signature mismatch")]
    SignatureMismatch,

    // =========================================================================
    // Freshness and identity
    // =========================================================================
    #[error("Invalid request timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Request timestamp outside tolerance")]
    ExpiredRequest,

    #[error("Application ID mismatch")]
    ApplicationMismatch,

    /// Body, inner request or typed request could not be decoded. Raised by
    /// the gateway before verification runs.
    #[error("Malformed request envelope: {0}")]
    MalformedEnvelope(String),
}

impl VerificationError {
    /// Stable identifier used in log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::InvalidUrl(_) => "invalid_url",
            VerificationError::UntrustedScheme => "untrusted_scheme",
            VerificationError::UntrustedHost => "untrusted_host",
            VerificationError::UntrustedPort => "untrusted_port",
            VerificationError::InvalidHostFormat => "invalid_host_format",
            VerificationError::UntrustedPath => "untrusted_path",
            VerificationError::FetchError(_) => "fetch_error",
            VerificationError::IncompleteChain => "incomplete_chain",
            VerificationError::ChainVerificationFailed(_) => "chain_verification_failed",
            VerificationError::HostnameMismatch => "hostname_mismatch",
            VerificationError::MissingHeader(_) => "missing_header",
            VerificationError::InvalidEncoding => "invalid_encoding",
            VerificationError::SignatureMismatch => "signature_mismatch",
            VerificationError::InvalidTimestamp(_) => "invalid_timestamp",
            VerificationError::ExpiredRequest => "expired_request",
            VerificationError::ApplicationMismatch => "application_mismatch",
            VerificationError::MalformedEnvelope(_) => "malformed_envelope",
        }
    }

    /// Whether the failure concerns the signer URL or its certificate chain,
    /// as opposed to the request itself.
    pub fn is_certificate_failure(&self) -> bool {
        matches!(
            self,
            VerificationError::InvalidUrl(_)
                | VerificationError::UntrustedScheme
                | VerificationError::UntrustedHost
                | VerificationError::UntrustedPort
                | VerificationError::InvalidHostFormat
                | VerificationError::UntrustedPath
                | VerificationError::FetchError(_)
                | VerificationError::IncompleteChain
                | VerificationError::ChainVerificationFailed(_)
                | VerificationError::HostnameMismatch
        )
    }
}
