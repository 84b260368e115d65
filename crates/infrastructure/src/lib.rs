//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: commute routing over
//! the Entur clients, and the calendar sources (Google Calendar, a fixed test
//! event, canned scenarios). Also owns configuration loading.

pub mod adapters;
pub mod config;

pub use adapters::*;
pub use config::{
    AppConfig, CalendarAppConfig, CalendarSource, CommuteConfig, Environment, FixedEventConfig,
    GoogleCalendarConfig, ServerConfig,
};
