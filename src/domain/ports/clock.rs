//! Clock Port

use std::time::SystemTime;

/// Source of wall-clock time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}
