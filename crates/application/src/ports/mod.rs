//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod calendar_port;
mod commute_port;

#[cfg(test)]
pub use calendar_port::MockCalendarPort;
pub use calendar_port::{CalendarError, CalendarEvent, CalendarPort};
#[cfg(test)]
pub use commute_port::MockCommutePort;
pub use commute_port::CommutePort;
