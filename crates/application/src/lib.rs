//! Application layer - Use cases and orchestration
//!
//! Picks the event a commute is planned for, asks the routing port for
//! routes and classifies what went wrong. Orchestrates domain objects and
//! infrastructure adapters through ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
