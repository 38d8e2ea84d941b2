//! Provider Client Map
//!
//! Resolves a provider name to the wire adapter that speaks its API.

use crate::adapters::outbound::{IpApiProvider, IpLocationNetProvider, IP_API, IPLOCATION_NET};
use crate::domain::ports::GeoProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for a single upstream call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by all provider adapters.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("ipcheck/{}", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map from provider name to adapter, built once at startup.
#[derive(Clone, Default)]
pub struct ProviderClients {
    adapters: HashMap<String, Arc<dyn GeoProvider>>,
}

impl ProviderClients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapters for every built-in wire format, sharing one HTTP client.
    pub fn builtin(http: reqwest::Client) -> Self {
        Self::new()
            .with(IPLOCATION_NET, Arc::new(IpLocationNetProvider::new(http.clone())))
            .with(IP_API, Arc::new(IpApiProvider::new(http)))
    }

    /// Register (or replace) the adapter for `name`.
    pub fn with(mut self, name: impl Into<String>, adapter: Arc<dyn GeoProvider>) -> Self {
        self.adapters.insert(name.into(), adapter);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn GeoProvider>> {
        self.adapters.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
