//! HTTP adapter for `CertificateFetcher`.

use std::time::Duration;

use bytes::BytesMut;
use reqwest::Client;
use tracing::debug;

use crate::ports::outbound::{CertificateFetcher, FetchError};

/// Limits applied to every chain download.
#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    /// Whole-request deadline, connect included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Chains larger than this are refused.
    pub max_chain_size: usize,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_chain_size: 64 * 1024,
        }
    }
}

/// Downloads certificate chains with `reqwest`.
pub struct HttpCertificateFetcher {
    client: Client,
    max_chain_size: usize,
}

impl HttpCertificateFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .https_only(true)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            max_chain_size: config.max_chain_size,
        })
    }
}

#[async_trait::async_trait]
impl CertificateFetcher for HttpCertificateFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let limit = self.max_chain_size;
        if response
            .content_length()
            .is_some_and(|length| length > limit as u64)
        {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
        {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "Fetched certificate chain");
        Ok(body.to_vec())
    }
}
