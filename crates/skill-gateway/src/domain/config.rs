//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use skill_verification::{HttpFetcherConfig, VerificationConfig, DEFAULT_TIMESTAMP_TOLERANCE};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Routes served next to the webhook.
pub const HEALTH_PATH: &str = "/health";
pub const METRICS_PATH: &str = "/metrics";
const RESERVED_PATHS: [&str; 2] = [HEALTH_PATH, METRICS_PATH];

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request authentication
    pub verification: VerificationSettings,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;

        if self.verification.enabled && self.verification.application_id.is_empty() {
            return Err(ConfigError::MissingApplicationId);
        }

        if self.verification.max_chain_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_chain_size cannot be 0".into(),
            ));
        }

        if self.verification.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "fetch timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Validate only what the HTTP server uses. The `verification` section
    /// is not consulted.
    pub fn validate_server(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http port cannot be 0".into()));
        }

        if !self.http.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "webhook path must start with '/': {}",
                self.http.path
            )));
        }

        if RESERVED_PATHS.contains(&self.http.path.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "webhook path collides with a built-in route: {}",
                self.http.path
            )));
        }

        if self.limits.max_body_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_size cannot be 0".into(),
            ));
        }

        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Settings for `RequestVerificationService`.
    pub fn to_verification_config(&self) -> VerificationConfig {
        VerificationConfig {
            enabled: self.verification.enabled,
            application_id: self.verification.application_id.clone(),
            timestamp_tolerance: self.verification.timestamp_tolerance,
            cert_cache_ttl: self.verification.cert_cache_ttl,
        }
    }

    /// Settings for `HttpCertificateFetcher`.
    pub fn to_fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            timeout: self.verification.fetch_timeout,
            max_chain_size: self.verification.max_chain_size,
            ..HttpFetcherConfig::default()
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// Route the platform POSTs to
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            path: "/".to_string(),
        }
    }
}

/// Request authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    /// Disable only for local development
    pub enabled: bool,
    /// Skill application ID requests must target
    pub application_id: String,
    /// Allowed skew of the request timestamp
    #[serde(with = "humantime_serde")]
    pub timestamp_tolerance: Duration,
    /// Re-validate cached signing certificates after this long (None = never)
    #[serde(with = "humantime_serde")]
    pub cert_cache_ttl: Option<Duration>,
    /// Deadline for downloading a certificate chain
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,
    /// Largest accepted certificate chain in bytes (default: 64KB)
    pub max_chain_size: usize,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            application_id: String::new(),
            timestamp_tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
            cert_cache_ttl: None,
            fetch_timeout: Duration::from_secs(5),
            max_chain_size: 64 * 1024,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 256KB)
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 256 * 1024,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline, verification and handler included
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Verification is on but no application ID was given
    #[error("application_id is required when verification is enabled")]
    MissingApplicationId,
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
