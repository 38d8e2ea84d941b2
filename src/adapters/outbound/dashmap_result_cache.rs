//! DashMap Result Cache
//!
//! Implements ResultCache using DashMap for sharded concurrent access.

use crate::domain::entities::{
    unix_seconds, CacheEntry, CacheEntryStats, CacheStats, GeoRecord, DEFAULT_CACHE_TTL,
};
use crate::domain::ports::{Clock, ResultCache};
use crate::adapters::outbound::SystemClock;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// DashMap-backed result cache.
///
/// Each shard is guarded by its own reader/writer lock, so lookups of
/// different keys proceed in parallel and writers only block readers of
/// the same shard. Stale entries are evicted lazily when read.
pub struct DashMapResultCache {
    entries: DashMap<IpAddr, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl DashMapResultCache {
    /// Create a cache with the default one hour TTL and the system clock.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_CACHE_TTL, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DashMapResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache for DashMapResultCache {
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(&ip)?;
            if !entry.is_expired(now) {
                return Some(entry.record.clone());
            }
        }

        // Re-checked under the shard write lock so a fresh insert that
        // raced in between is kept.
        if self
            .entries
            .remove_if(&ip, |_, entry| entry.is_expired(now))
            .is_some()
        {
            tracing::debug!("evicted expired cache entry for {}", ip);
        }
        None
    }

    fn insert(&self, ip: IpAddr, record: GeoRecord) {
        let entry = CacheEntry::new(record, self.clock.now(), self.ttl);
        self.entries.insert(ip, entry);
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut entries: Vec<CacheEntryStats> = self
            .entries
            .iter()
            .map(|entry| CacheEntryStats {
                ip: entry.key().to_string(),
                cached_at: unix_seconds(entry.cached_at),
                expires_at: unix_seconds(entry.expires_at),
                expired: entry.is_expired(now),
            })
            .collect();
        entries.sort_by(|a, b| a.ip.cmp(&b.ip));

        CacheStats {
            total_entries: entries.len(),
            entries,
        }
    }
}
