//! Certificate Store - cache of validated signing certificates keyed by the
//! exact chain URL string.
//!
//! Entries are only ever inserted after full validation. Concurrent misses for
//! the same URL may both fetch; the later insert wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use super::entities::{CacheSnapshot, SigningCertificate};

struct CachedCertificate {
    certificate: Arc<SigningCertificate>,
    inserted_at: Instant,
}

/// Statistics for the certificate store
#[derive(Debug, Default)]
pub struct StoreStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub inserts: AtomicU64,
}

/// Process-wide certificate cache, shared by `Arc`.
pub struct CertificateStore {
    entries: DashMap<String, CachedCertificate>,
    /// `None` keeps entries until explicitly invalidated.
    ttl: Option<Duration>,
    stats: StoreStats,
}

impl Default for CertificateStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CertificateStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            stats: StoreStats::default(),
        }
    }

    /// Look up a certificate. Entries older than the TTL count as absent and
    /// are dropped.
    pub fn get(&self, url: &str) -> Option<Arc<SigningCertificate>> {
        let lookup = self
            .entries
            .get(url)
            .map(|entry| (Arc::clone(&entry.certificate), self.is_fresh(&entry)));

        match lookup {
            Some((certificate, true)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(certificate)
            }
            Some((_, false)) => {
                self.evict_if_expired(url);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(url, "Cached signing certificate expired");
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn is_fresh(&self, entry: &CachedCertificate) -> bool {
        self.ttl
            .map_or(true, |ttl| entry.inserted_at.elapsed() < ttl)
    }

    /// Drop the entry for `url` only if it is still expired under the shard
    /// lock, so a concurrent re-insert survives.
    fn evict_if_expired(&self, url: &str) -> bool {
        self.entries
            .remove_if(url, |_, entry| !self.is_fresh(entry))
            .is_some()
    }

    /// Insert or replace the certificate for `url`.
    pub fn insert(&self, url: &str, certificate: Arc<SigningCertificate>) {
        self.entries.insert(
            url.to_string(),
            CachedCertificate {
                certificate,
                inserted_at: Instant::now(),
            },
        );
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Forget one URL. Returns true if it was cached.
    pub fn invalidate(&self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            entries: self.entries.len(),
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            inserts: self.stats.inserts.load(Ordering::Relaxed),
        }
    }
}
