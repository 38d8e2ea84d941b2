//! In-Memory Provider Registry
//!
//! Implements ProviderRegistry over a lock-guarded vector.

use crate::domain::entities::ProviderDescriptor;
use crate::domain::errors::ProviderNotFound;
use crate::domain::ports::ProviderRegistry;
use parking_lot::RwLock;

/// Provider list kept in configured order.
///
/// Readers clone a snapshot under the read lock; toggles and appends take
/// the write lock. A toggle that lands while a lookup is iterating only
/// affects later snapshots.
#[derive(Debug, Default)]
pub struct InMemoryProviderRegistry {
    providers: RwLock<Vec<ProviderDescriptor>>,
}

impl InMemoryProviderRegistry {
    pub fn new(providers: Vec<ProviderDescriptor>) -> Self {
        Self {
            providers: RwLock::new(providers),
        }
    }
}

impl ProviderRegistry for InMemoryProviderRegistry {
    fn enabled(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .read()
            .iter()
            .filter(|p| p.enabled)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<ProviderDescriptor> {
        self.providers.read().clone()
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), ProviderNotFound> {
        let mut providers = self.providers.write();
        match providers.iter_mut().find(|p| p.name == name) {
            Some(provider) => {
                provider.enabled = enabled;
                Ok(())
            }
            None => Err(ProviderNotFound(name.to_string())),
        }
    }

    fn add(&self, provider: ProviderDescriptor) {
        self.providers.write().push(provider);
    }
}
