use crate::adapters::outbound::{IPLOCATION_NET, IPLOCATION_NET_URL, IP_API, IP_API_URL};
use crate::domain::entities::{ProviderDescriptor, MAX_CACHE_TTL};
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub providers: Vec<ProviderDescriptor>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            providers: default_providers(),
            debug: false,
        }
    }
}

fn default_providers() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor::new(IPLOCATION_NET, IPLOCATION_NET_URL),
        ProviderDescriptor::new(IP_API, IP_API_URL).disabled(),
    ]
}

/// Parse `name=url` entries separated by commas.
///
/// A leading `!` registers the provider disabled. Entries without `=` or
/// with an empty name or url are skipped.
pub fn parse_providers(list: &str) -> Vec<ProviderDescriptor> {
    list.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (entry, enabled) = match entry.strip_prefix('!') {
                Some(rest) => (rest.trim(), false),
                None => (entry, true),
            };
            let (name, url) = entry.split_once('=')?;
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                tracing::warn!("ignoring malformed provider entry: {:?}", entry);
                return None;
            }
            let mut provider = ProviderDescriptor::new(name, url);
            provider.enabled = enabled;
            Some(provider)
        })
        .collect()
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr = std::env::var("IPCHECK_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

    let cache_ttl_secs = std::env::var("IPCHECK_CACHE_TTL_SECS")
        .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECS.to_string())
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs <= MAX_CACHE_TTL.as_secs())
        .unwrap_or(DEFAULT_CACHE_TTL_SECS);

    let fetch_timeout_secs = std::env::var("IPCHECK_FETCH_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_FETCH_TIMEOUT_SECS.to_string())
        .parse()
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

    let providers = std::env::var("IPCHECK_PROVIDERS")
        .map(|v| parse_providers(&v))
        .unwrap_or_else(|_| default_providers());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        listen_addr,
        cache_ttl_secs,
        fetch_timeout_secs,
        providers,
        debug,
    })
}
