//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod commute_adapter;
mod fixed_event_calendar_adapter;
mod google_calendar_adapter;
mod mock_calendar_adapter;

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::CalendarPort;
use integration_transit::LocalTimePolicy;
use tracing::info;

pub use commute_adapter::CommuteAdapter;
pub use fixed_event_calendar_adapter::FixedEventCalendarAdapter;
pub use google_calendar_adapter::GoogleCalendarAdapter;
pub use mock_calendar_adapter::{MockCalendarAdapter, MockScenario};

use crate::config::{CalendarAppConfig, CalendarSource};

/// Build the calendar adapter selected by `calendar.source`
///
/// # Errors
///
/// Returns an error if the Google HTTP client fails to initialize.
pub fn calendar_port_from_config(
    config: &CalendarAppConfig,
    local_time: LocalTimePolicy,
) -> Result<Arc<dyn CalendarPort>, ApplicationError> {
    info!(source = ?config.source, "Configuring calendar source");
    let port: Arc<dyn CalendarPort> = match config.source {
        CalendarSource::Google => Arc::new(GoogleCalendarAdapter::new(&config.google)?),
        CalendarSource::Fixed => Arc::new(FixedEventCalendarAdapter::new(
            config.fixed_event.clone(),
            local_time,
        )),
        CalendarSource::Mock => Arc::new(MockCalendarAdapter::new(
            MockScenario::from_id(&config.mock_scenario),
            local_time,
        )),
    };
    Ok(port)
}
