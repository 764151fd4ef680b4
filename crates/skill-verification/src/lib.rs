//! # Skill Request Verification
//!
//! Authenticates inbound voice-platform webhook calls before any skill code
//! sees them.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): URL policy, chain parsing and validation,
//!   signature, freshness and identity checks, certificate store. No I/O.
//! - **Ports Layer** (`ports/`): `RequestVerificationApi` (inbound) and
//!   `CertificateFetcher` (outbound)
//! - **Adapters** (`adapters/`): `reqwest` chain fetcher
//! - **Service Layer** (`service.rs`): wires domain logic to ports
//!
//! ## Trust Model
//!
//! - The chain URL must point at the platform's publishing bucket; the
//!   chain's own self-signed root is the only trust anchor.
//! - The leaf must be valid now and issued to `echo-api.amazon.com`.
//! - Only fully validated leaves are cached, keyed by the exact URL string.
//! - The body signature is SHA-1 with RSA (PKCS#1 v1.5) over the raw bytes.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

// Re-export public API
pub use adapters::{HttpCertificateFetcher, HttpFetcherConfig};
pub use domain::chain::{parse_certificate_chain, verify_certificate_chain};
pub use domain::entities::{
    CacheSnapshot, CertificateChain, SigningCertificate, VerificationConfig, VerificationRequest,
    CERT_CHAIN_URL_HEADER, DEFAULT_TIMESTAMP_TOLERANCE, SIGNATURE_HEADER, SIGNER_DNS_NAME,
};
pub use domain::errors::VerificationError;
pub use domain::freshness::{verify_application, verify_timestamp};
pub use domain::signature::verify_signature;
pub use domain::signer_url::verify_signer_url;
pub use domain::store::CertificateStore;
pub use ports::inbound::RequestVerificationApi;
pub use ports::outbound::{CertificateFetcher, FetchError};
pub use service::RequestVerificationService;
