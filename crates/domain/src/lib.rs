//! Domain layer for Homeboy
//!
//! Contains the commute vocabulary shared by every other crate: coordinates,
//! route summaries, legs and the commute payload handed to the dashboard.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
