//! # Freshness and Identity
//!
//! Replay window on the inner request timestamp, and the target application
//! check.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::errors::VerificationError;

/// Check that an RFC 3339 `timestamp` is within `tolerance` of `now`, in
/// either direction. A skew of exactly `tolerance` passes.
pub fn verify_timestamp(
    timestamp: &str,
    now: DateTime<Utc>,
    tolerance: Duration,
) -> Result<(), VerificationError> {
    let sent = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| VerificationError::InvalidTimestamp(e.to_string()))?;

    let skew = now
        .signed_duration_since(sent.with_timezone(&Utc))
        .abs()
        .to_std()
        .map_err(|e| VerificationError::InvalidTimestamp(e.to_string()))?;

    if skew > tolerance {
        return Err(VerificationError::ExpiredRequest);
    }

    Ok(())
}

/// Exact, case-sensitive comparison of the declared and configured IDs.
pub fn verify_application(declared: &str, expected: &str) -> Result<(), VerificationError> {
    if declared != expected {
        return Err(VerificationError::ApplicationMismatch);
    }
    Ok(())
}
