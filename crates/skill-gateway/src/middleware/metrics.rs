//! Gateway metrics, exported as JSON on `/metrics`.

use skill_verification::{CacheSnapshot, VerificationError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::SkillRequest;

/// Skill gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Rejections before dispatch
    pub rejected_invalid_format: AtomicU64,
    pub rejected_certificate: AtomicU64,
    pub rejected_signature: AtomicU64,
    pub rejected_freshness: AtomicU64,
    pub rejected_application: AtomicU64,

    // Dispatch counters
    pub dispatched_launch: AtomicU64,
    pub dispatched_intent: AtomicU64,
    pub dispatched_session_ended: AtomicU64,
    pub dispatched_unknown: AtomicU64,
    pub handler_errors: AtomicU64,

    // Latency tracking (simplified - in production use histograms)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, success: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a verification failure under its class
    pub fn record_rejection(&self, error: &VerificationError) {
        let counter = match error {
            e if e.is_certificate_failure() => &self.rejected_certificate,
            VerificationError::InvalidTimestamp(_) | VerificationError::ExpiredRequest => {
                &self.rejected_freshness
            }
            VerificationError::ApplicationMismatch => &self.rejected_application,
            VerificationError::MalformedEnvelope(_) => &self.rejected_invalid_format,
            _ => &self.rejected_signature,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record which handler a request was routed to
    pub fn record_dispatch(&self, request: &SkillRequest) {
        let counter = match request {
            SkillRequest::Launch(_) => &self.dispatched_launch,
            SkillRequest::Intent(_) => &self.dispatched_intent,
            SkillRequest::SessionEnded(_) => &self.dispatched_session_ended,
            SkillRequest::Unknown(_) => &self.dispatched_unknown,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_error(&self) {
        self.handler_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self, cache: CacheSnapshot) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
            },
            "rejections": {
                "invalid_format": self.rejected_invalid_format.load(Ordering::Relaxed),
                "certificate": self.rejected_certificate.load(Ordering::Relaxed),
                "signature": self.rejected_signature.load(Ordering::Relaxed),
                "freshness": self.rejected_freshness.load(Ordering::Relaxed),
                "application": self.rejected_application.load(Ordering::Relaxed),
            },
            "dispatch": {
                "launch": self.dispatched_launch.load(Ordering::Relaxed),
                "intent": self.dispatched_intent.load(Ordering::Relaxed),
                "session_ended": self.dispatched_session_ended.load(Ordering::Relaxed),
                "unknown": self.dispatched_unknown.load(Ordering::Relaxed),
                "handler_errors": self.handler_errors.load(Ordering::Relaxed),
            },
            "certificate_cache": {
                "entries": cache.entries,
                "hits": cache.hits,
                "misses": cache.misses,
                "inserts": cache.inserts,
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self, success: bool) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request(success, latency_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = GatewayMetrics::new();

        metrics.record_request(true, 100);
        metrics.record_request(true, 200);
        metrics.record_request(false, 30);

        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.requests_success.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.requests_error.load(Ordering::Relaxed), 1);
        assert!((metrics.average_latency_ms() - 110.0).abs() < 0.01);
    }

    #[test]
    fn test_rejection_classes() {
        let metrics = GatewayMetrics::new();

        metrics.record_rejection(&VerificationError::UntrustedHost);
        metrics.record_rejection(&VerificationError::IncompleteChain);
        metrics.record_rejection(&VerificationError::SignatureMismatch);
        metrics.record_rejection(&VerificationError::MissingHeader("Signature"));
        metrics.record_rejection(&VerificationError::ExpiredRequest);
        metrics.record_rejection(&VerificationError::ApplicationMismatch);

        assert_eq!(metrics.rejected_certificate.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.rejected_signature.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.rejected_freshness.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rejected_application.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_dispatch_counts() {
        let metrics = GatewayMetrics::new();

        metrics.record_dispatch(&SkillRequest::Launch(Default::default()));
        metrics.record_dispatch(&SkillRequest::Intent(Default::default()));
        metrics.record_dispatch(&SkillRequest::Unknown("AudioPlayer.PlaybackStarted".into()));

        assert_eq!(metrics.dispatched_launch.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.dispatched_intent.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.dispatched_unknown.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_json_export() {
        let metrics = GatewayMetrics::new();
        metrics.record_request(true, 100);
        metrics.record_rejection(&VerificationError::MalformedEnvelope("eof".into()));

        let json = metrics.to_json(CacheSnapshot {
            entries: 1,
            hits: 4,
            misses: 1,
            inserts: 1,
        });
        assert_eq!(json["requests"]["total"], 1);
        assert_eq!(json["rejections"]["invalid_format"], 1);
        assert_eq!(json["certificate_cache"]["hits"], 4);
    }
}
