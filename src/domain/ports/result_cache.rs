//! Result Cache Port
//!
//! Defines the interface for caching lookup results per IP address.

use crate::domain::entities::{CacheStats, GeoRecord};
use std::net::IpAddr;

/// Time-bounded cache of geolocation records keyed by IP address.
///
/// Expiry is passive: entries are only discovered stale on read or
/// dropped by `clear`. Implementations must be safe to share between
/// concurrent lookups.
pub trait ResultCache: Send + Sync {
    /// Return the cached record if present and fresh.
    ///
    /// An expired entry found here is evicted and reported as absent.
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord>;

    /// Store a record, replacing any previous entry for the same IP.
    fn insert(&self, ip: IpAddr, record: GeoRecord);

    /// Remove every entry.
    fn clear(&self);

    /// Snapshot of all entries, with expiry computed at call time.
    fn stats(&self) -> CacheStats;
}
