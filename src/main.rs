//! ipcheck - IP Geolocation API
//!
//! This is the composition root that wires together all the components.

use ipcheck::adapters::inbound::ApiServer;
use ipcheck::adapters::outbound::{
    build_http_client, DashMapResultCache, InMemoryProviderRegistry, ProviderClients, SystemClock,
};
use ipcheck::application::LookupService;
use ipcheck::config::load_config;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting ipcheck listen={} cache_ttl={}s providers={}",
        cfg.listen_addr,
        cfg.cache_ttl_secs,
        cfg.providers.len()
    );

    // ===== COMPOSITION ROOT =====

    // 1. Create outbound adapters

    // Upstream clients, one shared HTTP connection pool
    let http = build_http_client(Duration::from_secs(cfg.fetch_timeout_secs))?;
    let clients = ProviderClients::builtin(http);
    tracing::debug!("provider adapters: {}", clients.names().join(", "));

    for provider in &cfg.providers {
        if clients.get(&provider.name).is_none() {
            tracing::warn!(
                "provider {} has no adapter; lookups through it will fail",
                provider.name
            );
        }
    }

    // Provider registry (in-memory, ordered)
    let registry = Arc::new(InMemoryProviderRegistry::new(cfg.providers.clone()));

    // Result cache (DashMap)
    let cache = Arc::new(DashMapResultCache::with_clock(
        Duration::from_secs(cfg.cache_ttl_secs),
        Arc::new(SystemClock),
    ));

    // 2. Create application service
    let service = Arc::new(LookupService::new(cache, registry, clients));

    // 3. Create inbound adapter and run
    let server = ApiServer::new(cfg.listen_addr, service);

    server.run().await
}
