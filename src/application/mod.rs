//! Application Layer
//!
//! Use cases that wire domain ports together.

mod lookup_service;

pub use lookup_service::LookupService;
