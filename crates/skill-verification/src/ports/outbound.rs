//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies this subsystem needs from the outside world.

use thiserror::Error;

/// Error from certificate chain retrieval.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The chain exceeded the configured size limit
    #[error("Certificate chain larger than {limit} bytes")]
    TooLarge { limit: usize },
}

/// Retrieves the PEM certificate chain published at a signer URL.
///
/// Only called with URLs that already passed the signer URL policy.
#[async_trait::async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Fetch the raw chain bytes.
    ///
    /// # Errors
    /// * `FetchError::Transport` - the request could not be completed
    /// * `FetchError::Status` - the server answered with a non-2xx status
    /// * `FetchError::TooLarge` - the body exceeded the size limit
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
