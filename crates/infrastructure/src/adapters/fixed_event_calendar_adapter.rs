//! Fixed event adapter - Implements CalendarPort with one configured event
//!
//! Useful before a real calendar is connected: the event always lies a set
//! number of days ahead at a set local time.

use application::ports::{CalendarError, CalendarEvent, CalendarPort};
use async_trait::async_trait;
use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use integration_transit::LocalTimePolicy;
use tracing::debug;

use crate::config::FixedEventConfig;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Calendar that always contains the configured test event
#[derive(Debug, Clone)]
pub struct FixedEventCalendarAdapter {
    config: FixedEventConfig,
    local_time: LocalTimePolicy,
}

impl FixedEventCalendarAdapter {
    /// Create a new adapter; times are placed in `local_time`
    pub const fn new(config: FixedEventConfig, local_time: LocalTimePolicy) -> Self {
        Self { config, local_time }
    }

    /// The event as seen at `now`
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDateTime`] if the configured time does
    /// not exist on that local day.
    pub fn event_at(&self, now: DateTime<Utc>) -> Result<CalendarEvent, CalendarError> {
        let invalid = || {
            CalendarError::InvalidDateTime(format!(
                "{:02}:{:02} {} day(s) ahead",
                self.config.start_hour, self.config.start_minute, self.config.days_ahead
            ))
        };

        let day = self
            .local_time
            .localize(now)
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.config.days_ahead)))
            .ok_or_else(invalid)?;
        let time = NaiveTime::from_hms_opt(self.config.start_hour, self.config.start_minute, 0)
            .ok_or_else(invalid)?;
        let start = self
            .local_time
            .from_local(day.and_time(time))
            .ok_or_else(invalid)?;
        let end = start + Duration::minutes(i64::from(self.config.duration_minutes));

        Ok(CalendarEvent::new(
            "test-event",
            self.config.summary.clone(),
            start.format(LOCAL_FORMAT).to_string(),
            end.format(LOCAL_FORMAT).to_string(),
        )
        .with_location(self.config.location.clone())
        .in_calendar("test-calendar", "Test Calendar", "#4285f4"))
    }
}

#[async_trait]
impl CalendarPort for FixedEventCalendarAdapter {
    async fn upcoming_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let event = self.event_at(Utc::now())?;
        debug!(start = %event.start, location = ?event.location, "Serving fixed test event");
        Ok(vec![event])
    }

    async fn is_available(&self) -> bool {
        true
    }
}
