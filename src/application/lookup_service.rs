//! Lookup Service - Main application use case
//!
//! Orchestrates a geolocation lookup: cache first, then the enabled
//! providers in round-robin order with fallback. Also exposes the
//! administrative operations on the cache and the provider list.

use crate::adapters::outbound::ProviderClients;
use crate::domain::entities::{CacheStats, GeoRecord, ProviderDescriptor};
use crate::domain::errors::{FetchError, LookupError, ProviderNotFound};
use crate::domain::ports::{ProviderRegistry, ResultCache};
use crate::domain::services::RoundRobin;
use crate::domain::value_objects::IpVersion;
use std::net::IpAddr;
use std::sync::Arc;

/// Lookup service - main application use case.
///
/// One instance is shared by every request for the lifetime of the
/// process. The cache, the registry and the rotation cursor each guard
/// their own state, so concurrent lookups never need a service-wide lock.
pub struct LookupService {
    cache: Arc<dyn ResultCache>,
    registry: Arc<dyn ProviderRegistry>,
    clients: ProviderClients,
    rotation: RoundRobin,
}

impl LookupService {
    /// Create a new lookup service.
    pub fn new(
        cache: Arc<dyn ResultCache>,
        registry: Arc<dyn ProviderRegistry>,
        clients: ProviderClients,
    ) -> Self {
        Self {
            cache,
            registry,
            clients,
            rotation: RoundRobin::new(),
        }
    }

    /// Resolve geolocation data for an IP address.
    ///
    /// 1. Validates `ip` and defaults `ip_version` to IPv4
    /// 2. Returns the cached record when one is fresh
    /// 3. Otherwise tries each enabled provider at most once, in rotation
    ///    order, stopping at the first success and caching it
    ///
    /// Individual provider failures are logged and never returned.
    pub async fn lookup(
        &self,
        ip: &str,
        ip_version: Option<&str>,
    ) -> Result<GeoRecord, LookupError> {
        let ip_version = IpVersion::parse(ip_version)?;
        let addr: IpAddr = ip
            .parse()
            .map_err(|_| LookupError::InvalidInput(format!("invalid IP address: {}", ip)))?;

        if let Some(record) = self.cache.lookup(addr) {
            tracing::debug!("cache hit for {}", addr);
            return Ok(record);
        }

        // The iteration bound comes from this snapshot even if providers
        // are toggled while we loop.
        let enabled = self.registry.enabled();
        if enabled.is_empty() {
            tracing::warn!("no enabled providers available for {}", addr);
            return Err(LookupError::NoProvidersAvailable);
        }

        let target = addr.to_string();
        let mut attempts = 0;
        for _ in 0..enabled.len() {
            let Some(provider) = self.rotation.next(&enabled) else {
                break;
            };
            attempts += 1;

            match self.fetch_from(provider, &target, ip_version).await {
                Ok(record) => {
                    tracing::debug!("provider {} resolved {}", provider.name, addr);
                    self.cache.insert(addr, record.clone());
                    return Ok(record);
                }
                Err(e) => {
                    tracing::warn!("provider {} failed for {}: {}", provider.name, addr, e);
                }
            }
        }

        Err(LookupError::AllProvidersFailed { attempts })
    }

    async fn fetch_from(
        &self,
        provider: &ProviderDescriptor,
        ip: &str,
        ip_version: IpVersion,
    ) -> Result<GeoRecord, FetchError> {
        let adapter = self
            .clients
            .get(&provider.name)
            .ok_or_else(|| FetchError::Unsupported(provider.name.clone()))?;
        adapter.fetch(&provider.url, ip, ip_version).await
    }

    /// All configured providers, disabled ones included.
    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        self.registry.all()
    }

    /// Enable or disable a provider by name.
    pub fn set_provider_enabled(&self, name: &str, enabled: bool) -> Result<(), ProviderNotFound> {
        self.registry.set_enabled(name, enabled)?;
        tracing::info!(
            "provider {} {}",
            name,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Register an additional provider at runtime.
    pub fn add_provider(&self, provider: ProviderDescriptor) {
        tracing::info!("provider {} added ({})", provider.name, provider.url);
        self.registry.add(provider);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("cache cleared");
    }
}
