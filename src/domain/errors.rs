//! Domain Errors
//!
//! Failure values for provider fetches, lookups and administrative calls.

/// A single upstream provider attempt failed.
///
/// Always recoverable: the lookup service moves on to the next provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("failed to make request: {0}")]
    Transport(String),
    #[error("API returned status code: {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("provider reported failure: {0}")]
    Upstream(String),
    #[error("unsupported provider: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// A lookup could not produce a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no enabled providers available")]
    NoProvidersAvailable,
    #[error("all providers failed to fetch IP information ({attempts} attempts)")]
    AllProvidersFailed { attempts: usize },
}

/// An administrative call named a provider that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider {0} not found")]
pub struct ProviderNotFound(pub String);
