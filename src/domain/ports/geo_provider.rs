//! Geo Provider Port
//!
//! Defines the interface for fetching geolocation data from one upstream.

use crate::domain::entities::GeoRecord;
use crate::domain::errors::FetchError;
use crate::domain::value_objects::IpVersion;
use async_trait::async_trait;

/// Client for a single upstream wire format.
///
/// One implementation exists per distinct provider API. Implementations
/// make exactly one bounded upstream call per `fetch` and never retry;
/// falling back to another provider is the lookup service's job.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Fetch and normalize geolocation data for `ip` from `endpoint`.
    async fn fetch(
        &self,
        endpoint: &str,
        ip: &str,
        ip_version: IpVersion,
    ) -> Result<GeoRecord, FetchError>;
}
