//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the ipcheck domain.
//! They have no external dependencies beyond serde.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default time-to-live for cached lookups.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Longest TTL an entry can carry; larger values are clamped to it.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Seconds since the Unix epoch (negative before 1970).
pub fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Provider-agnostic geolocation result.
///
/// String fields are empty when the upstream did not know them.
/// `timestamp` is the moment the record was produced by this service,
/// never a value reported by the provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    pub ip_address: String,
    pub country_name: String,
    pub country_code: String,
    pub region_name: String,
    pub city_name: String,
    pub isp: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Capture time, epoch seconds
    pub timestamp: i64,
}

/// A record held by the result cache.
///
/// `expires_at` is `cached_at + ttl`, with `ttl` clamped to `MAX_CACHE_TTL`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record: GeoRecord,
    pub cached_at: SystemTime,
    pub expires_at: SystemTime,
}

impl CacheEntry {
    pub fn new(record: GeoRecord, cached_at: SystemTime, ttl: Duration) -> Self {
        Self {
            record,
            cached_at,
            expires_at: cached_at
                .checked_add(ttl.min(MAX_CACHE_TTL))
                .unwrap_or(cached_at),
        }
    }

    /// An entry is expired at and after its expiry instant.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// An upstream geolocation provider.
///
/// `name` identifies the provider and selects the wire adapter used to
/// talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

impl ProviderDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntryStats {
    pub ip: String,
    pub cached_at: i64,
    pub expires_at: i64,
    pub expired: bool,
}

/// Point-in-time view of the whole cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub entries: Vec<CacheEntryStats>,
}
