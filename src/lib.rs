//! ipcheck Library
//!
//! IP geolocation lookups through a rotating set of upstream providers,
//! with a TTL result cache in front of them.
//!
//! The components are exposed for integration tests and for embedding the
//! service in another binary.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{ApiServer, ApiState};
pub use application::LookupService;
pub use config::{load_config, Config};
pub use domain::entities::{CacheEntry, CacheStats, GeoRecord, ProviderDescriptor};
pub use domain::errors::{FetchError, LookupError, ProviderNotFound};
pub use domain::ports::{Clock, GeoProvider, ProviderRegistry, ResultCache};
pub use domain::services::RoundRobin;
pub use domain::value_objects::IpVersion;
