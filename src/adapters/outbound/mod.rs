mod clock;
mod dashmap_result_cache;
mod in_memory_provider_registry;
mod ip_api_provider;
mod iplocation_net_provider;
mod provider_clients;

pub use clock::{ManualClock, SystemClock};
pub use dashmap_result_cache::DashMapResultCache;
pub use in_memory_provider_registry::InMemoryProviderRegistry;
pub use ip_api_provider::{IpApiProvider, IP_API, IP_API_URL};
pub use iplocation_net_provider::{IpLocationNetProvider, IPLOCATION_NET, IPLOCATION_NET_URL};
pub use provider_clients::{build_http_client, ProviderClients, DEFAULT_FETCH_TIMEOUT};
