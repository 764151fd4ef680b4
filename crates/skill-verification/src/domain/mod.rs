//! # Domain Layer
//!
//! Pure verification logic. Nothing here performs I/O; the certificate
//! fetch goes through `ports::outbound::CertificateFetcher`.

pub mod chain;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod signature;
pub mod signer_url;
pub mod store;
