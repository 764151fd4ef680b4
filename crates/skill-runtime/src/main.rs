//! # Skill Runtime
//!
//! Serves the echo skill behind the authenticating webhook gateway.
//!
//! ## Usage
//!
//! ```text
//! SKILL_APPLICATION_ID=amzn1.ask.skill.... skill-runtime
//! SKILL_VERIFY_REQUESTS=false SKILL_HTTP_PORT=3000 skill-runtime   # local testing
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skill_gateway::SkillGatewayService;
use skill_runtime::{config_from_env, EchoSkill, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    // Load configuration
    let config = config_from_env().context("reading configuration from environment")?;
    if !config.verification.enabled {
        warn!("Request verification is DISABLED; do not expose this endpoint publicly");
    }

    let gateway = SkillGatewayService::from_config(config, Arc::new(EchoSkill))
        .context("building skill gateway")?;

    info!(version = skill_gateway::VERSION, "Starting skill runtime");
    gateway
        .run(shutdown_signal())
        .await
        .context("serving skill gateway")?;

    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; shutting down");
        return;
    }
    info!("Received shutdown signal");
}
