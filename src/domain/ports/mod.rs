mod clock;
mod geo_provider;
mod provider_registry;
mod result_cache;

pub use clock::Clock;
pub use geo_provider::GeoProvider;
pub use provider_registry::ProviderRegistry;
pub use result_cache::ResultCache;
