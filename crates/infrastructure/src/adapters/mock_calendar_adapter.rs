//! Mock calendar adapter - canned scenarios for demos and UI work

use application::ports::{CalendarError, CalendarEvent, CalendarPort};
use async_trait::async_trait;
use chrono::{DateTime, Days, Duration, NaiveTime, SecondsFormat, Utc};
use integration_transit::LocalTimePolicy;
use tracing::{debug, warn};

/// A canned calendar state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockScenario {
    /// Tomorrow 15:00 at Asker station
    MorningCommute,
    /// Today 18:00 at Oslo S
    EveningEvent,
    /// Two hours from now in central Oslo
    NearbyEvent,
    /// Empty calendar
    #[default]
    NoEvents,
}

impl MockScenario {
    /// Look up a scenario by id; unknown ids mean an empty calendar
    pub fn from_id(id: &str) -> Self {
        match id {
            "morningCommute" => Self::MorningCommute,
            "eveningEvent" => Self::EveningEvent,
            "nearbyEvent" => Self::NearbyEvent,
            "noEvents" => Self::NoEvents,
            other => {
                warn!(scenario = other, "Unknown mock scenario, using noEvents");
                Self::NoEvents
            },
        }
    }

    /// The scenario's id
    pub const fn id(self) -> &'static str {
        match self {
            Self::MorningCommute => "morningCommute",
            Self::EveningEvent => "eveningEvent",
            Self::NearbyEvent => "nearbyEvent",
            Self::NoEvents => "noEvents",
        }
    }
}

/// Calendar that serves one [`MockScenario`]
#[derive(Debug, Clone)]
pub struct MockCalendarAdapter {
    scenario: MockScenario,
    local_time: LocalTimePolicy,
}

impl MockCalendarAdapter {
    /// Create a new adapter; wall-clock scenario times are placed in `local_time`
    pub const fn new(scenario: MockScenario, local_time: LocalTimePolicy) -> Self {
        Self {
            scenario,
            local_time,
        }
    }

    /// The active scenario
    pub const fn scenario(&self) -> MockScenario {
        self.scenario
    }

    fn local_at(&self, now: DateTime<Utc>, days_ahead: u64, hour: u32) -> Option<DateTime<Utc>> {
        let day = self
            .local_time
            .localize(now)
            .date_naive()
            .checked_add_days(Days::new(days_ahead))?;
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        self.local_time
            .from_local(day.and_time(time))
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The scenario's events as seen at `now`
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDateTime`] if a scenario time does not
    /// exist locally.
    pub fn events_at(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        let (start, location) = match self.scenario {
            MockScenario::NoEvents => return Ok(Vec::new()),
            MockScenario::MorningCommute => (
                self.local_at(now, 1, 15),
                "Asker stasjon, Asker, Norway",
            ),
            MockScenario::EveningEvent => (self.local_at(now, 0, 18), "Oslo S, Oslo, Norway"),
            MockScenario::NearbyEvent => (
                Some(now + Duration::hours(2)),
                "Kongens gate 7, 0153 Oslo, Norway",
            ),
        };

        let start = start.ok_or_else(|| {
            CalendarError::InvalidDateTime(format!("scenario {}", self.scenario.id()))
        })?;
        let end = start + Duration::hours(2);

        Ok(vec![
            CalendarEvent::new(
                "mock-event-1",
                "Team Meeting",
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
                end.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .with_description("Mock event for testing")
            .with_location(location)
            .in_calendar("mock-calendar", "Work", "#4285f4"),
        ])
    }
}

#[async_trait]
impl CalendarPort for MockCalendarAdapter {
    async fn upcoming_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let events = self.events_at(Utc::now())?;
        debug!(scenario = self.scenario.id(), count = events.len(), "Serving mock events");
        Ok(events)
    }

    async fn is_available(&self) -> bool {
        true
    }
}
