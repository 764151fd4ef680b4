//! # Request Verification Service
//!
//! Application service layer that implements the `RequestVerificationApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`RequestVerificationApi`)
//! - Uses the outbound port (`CertificateFetcher`) on certificate cache misses
//! - Delegates every policy decision to the domain layer

use std::sync::Arc;
use std::time::SystemTime;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::chain::{parse_certificate_chain, verify_certificate_chain};
use crate::domain::entities::{
    CacheSnapshot, SigningCertificate, VerificationConfig, VerificationRequest,
    CERT_CHAIN_URL_HEADER, SIGNATURE_HEADER,
};
use crate::domain::errors::VerificationError;
use crate::domain::freshness::{verify_application, verify_timestamp};
use crate::domain::signature::verify_signature;
use crate::domain::signer_url::verify_signer_url;
use crate::domain::store::CertificateStore;
use crate::ports::inbound::RequestVerificationApi;
use crate::ports::outbound::CertificateFetcher;

/// Request Verification Service.
///
/// Holds the certificate store by `Arc` so several services (or tests) can
/// share one cache.
pub struct RequestVerificationService<F: CertificateFetcher> {
    config: VerificationConfig,
    store: Arc<CertificateStore>,
    fetcher: F,
}

impl<F: CertificateFetcher> RequestVerificationService<F> {
    /// Create a service with its own certificate store.
    pub fn new(config: VerificationConfig, fetcher: F) -> Self {
        let store = Arc::new(CertificateStore::new(config.cert_cache_ttl));
        Self::with_store(config, store, fetcher)
    }

    pub fn with_store(config: VerificationConfig, store: Arc<CertificateStore>, fetcher: F) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CertificateStore> {
        &self.store
    }

    /// URL policy, fetch, parse and chain validation for a cache miss.
    async fn fetch_and_validate(&self, url: &str) -> Result<SigningCertificate, VerificationError> {
        verify_signer_url(url)?;

        let material = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| VerificationError::FetchError(e.to_string()))?;

        let chain = parse_certificate_chain(&material)?;
        verify_certificate_chain(&chain, SystemTime::now())
    }
}

#[async_trait::async_trait]
impl<F: CertificateFetcher> RequestVerificationApi for RequestVerificationService<F> {
    async fn verify(&self, request: &VerificationRequest<'_>) -> Result<(), VerificationError> {
        if !self.config.enabled {
            return Ok(());
        }

        let result: Result<(), VerificationError> = async {
            let url = request
                .cert_chain_url
                .filter(|value| !value.is_empty())
                .ok_or(VerificationError::MissingHeader(CERT_CHAIN_URL_HEADER))?;
            let signature = request
                .signature
                .filter(|value| !value.is_empty())
                .ok_or(VerificationError::MissingHeader(SIGNATURE_HEADER))?;

            let certificate = self.resolve_certificate(url).await?;
            verify_signature(&certificate, request.body, signature)?;
            verify_timestamp(
                request.timestamp,
                Utc::now(),
                self.config.timestamp_tolerance,
            )?;
            verify_application(request.application_id, &self.config.application_id)
        }
        .await;

        if let Err(e) = &result {
            warn!(kind = e.kind(), error = %e, "Request failed verification");
        }
        result
    }

    async fn resolve_certificate(
        &self,
        url: &str,
    ) -> Result<Arc<SigningCertificate>, VerificationError> {
        if let Some(certificate) = self.store.get(url) {
            debug!(url, "Signing certificate cache hit");
            return Ok(certificate);
        }

        let certificate = Arc::new(self.fetch_and_validate(url).await?);
        self.store.insert(url, Arc::clone(&certificate));

        info!(url, "Trusted new signing certificate chain");
        Ok(certificate)
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn cache_snapshot(&self) -> CacheSnapshot {
        self.store.snapshot()
    }

    fn invalidate_certificate(&self, url: &str) -> bool {
        self.store.invalidate(url)
    }
}

// =============================================================================
// TESTS
// =============================================================================
