//! Synthetic commute data for demo and offline use
//!
//! Three fixed Oslo-area routes that arrive exactly at the event start.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use domain::{CommuteData, DomainError, Leg, RouteMode, RouteSummary};

use crate::ports::CalendarEvent;

struct MockLine {
    mode: &'static str,
    public_code: &'static str,
    name: &'static str,
    duration_minutes: u32,
}

const MOCK_LINES: [MockLine; 3] = [
    MockLine {
        mode: "bus",
        public_code: "31",
        name: "Snarøya - Fornebu - Tonsenhagen",
        duration_minutes: 42,
    },
    MockLine {
        mode: "rail",
        public_code: "RE10",
        name: "Drammen - Oslo S - Lillehammer",
        duration_minutes: 38,
    },
    MockLine {
        mode: "bus",
        public_code: "270",
        name: "Asker - Sandvika - Fornebu",
        duration_minutes: 48,
    },
];

impl MockLine {
    /// Where the first walk ends, and walking minutes before and after the ride
    fn walks(&self) -> (&'static str, u32, u32) {
        if self.mode == "rail" {
            ("station", 8, 12)
        } else {
            ("bus stop", 5, 10)
        }
    }

    fn route(&self, arrival: DateTime<FixedOffset>) -> Result<RouteSummary, DomainError> {
        let (stop, walk_in, walk_out) = self.walks();
        let ride = self.duration_minutes.saturating_sub(walk_in + walk_out);
        let depart_by = arrival - Duration::minutes(i64::from(self.duration_minutes));

        RouteSummary::new(
            RouteMode::Transit,
            self.duration_minutes,
            depart_by,
            arrival,
            vec![
                Leg::walk_to("foot", stop, walk_in),
                Leg::ride(self.mode, self.public_code, self.name, ride),
                Leg::walk_to("foot", "destination", walk_out),
            ],
        )
    }
}

fn parse_arrival(raw: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| DomainError::InvalidDateTime(raw.to_string()))
}

/// Three synthetic routes arriving at `event_start`
///
/// # Errors
///
/// Returns [`DomainError::InvalidDateTime`] if `event_start` is neither an
/// RFC 3339 timestamp nor a date.
pub fn mock_routes(event_start: &str) -> Result<Vec<RouteSummary>, DomainError> {
    let arrival = parse_arrival(event_start)?;
    MOCK_LINES.iter().map(|line| line.route(arrival)).collect()
}

/// A complete commute payload for `event` built from [`mock_routes`]
///
/// # Errors
///
/// Returns [`DomainError::InvalidDateTime`] if the event start cannot be read.
pub fn mock_commute_data(event: &CalendarEvent) -> Result<CommuteData, DomainError> {
    Ok(CommuteData {
        destination: event
            .travel_location()
            .unwrap_or("Unknown")
            .to_string(),
        departure_time: event.start.clone(),
        routes: mock_routes(&event.start)?,
        event_summary: event.summary.clone(),
    })
}
