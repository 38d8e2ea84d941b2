//! Domain Layer
//!
//! Entities, value objects and ports for the lookup cache. Nothing in
//! here performs I/O.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;
