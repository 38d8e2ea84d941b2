//! Provider Registry Port
//!
//! Defines the interface for the ordered list of upstream providers.

use crate::domain::entities::ProviderDescriptor;
use crate::domain::errors::ProviderNotFound;

/// Ordered set of configured providers.
///
/// Names are not required to be unique; name-based operations only ever
/// address the first match.
pub trait ProviderRegistry: Send + Sync {
    /// Enabled providers, in configured order.
    fn enabled(&self) -> Vec<ProviderDescriptor>;

    /// All providers, including disabled ones.
    fn all(&self) -> Vec<ProviderDescriptor>;

    /// Toggle the first provider named `name`.
    fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), ProviderNotFound>;

    /// Append a provider.
    fn add(&self, provider: ProviderDescriptor);
}
