//! Calendar port for application layer
//!
//! Supplies the upcoming events a commute is planned for. Implemented by
//! adapters in the infrastructure layer (Google Calendar, a fixed test
//! event, canned scenarios).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar port errors
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Calendar service unavailable")]
    ServiceUnavailable,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authentication expired")]
    AuthenticationExpired,

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

/// Calendar event representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Unique event identifier
    pub id: String,
    /// Event title
    pub summary: String,
    /// Event description
    pub description: Option<String>,
    /// Start time (RFC 3339, or `YYYY-MM-DD` for all-day events)
    pub start: String,
    /// End time (RFC 3339, or `YYYY-MM-DD` for all-day events)
    pub end: String,
    /// Free-text location
    pub location: Option<String>,
    /// Whether this is an all-day event
    pub is_all_day: bool,
    /// Calendar the event belongs to
    pub calendar_id: String,
    /// Display name of that calendar
    pub calendar_name: String,
    /// Calendar colour (hex)
    pub calendar_color: String,
}

impl CalendarEvent {
    /// Create a new calendar event
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            start: start.into(),
            end: end.into(),
            location: None,
            is_all_day: false,
            calendar_id: String::new(),
            calendar_name: String::new(),
            calendar_color: "#4285f4".to_string(),
        }
    }

    /// Set the event description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Mark as all-day event
    #[must_use]
    pub const fn as_all_day(mut self) -> Self {
        self.is_all_day = true;
        self
    }

    /// Attach the owning calendar
    #[must_use]
    pub fn in_calendar(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.calendar_id = id.into();
        self.calendar_name = name.into();
        self.calendar_color = color.into();
        self
    }

    /// The location, if it has any non-blank text
    #[must_use]
    pub fn travel_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    /// Start as an instant; date-only starts count as UTC midnight
    #[must_use]
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.start.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Calendar port trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Upcoming events across all of the user's calendars, in no particular order
    async fn upcoming_events(&self) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Check if the calendar service is available
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_event_creation() {
        let event = CalendarEvent::new(
            "evt-1",
            "Meeting",
            "2024-01-15T10:00:00Z",
            "2024-01-15T11:00:00Z",
        );
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.summary, "Meeting");
        assert!(!event.is_all_day);
        assert!(event.travel_location().is_none());
    }

    #[test]
    fn calendar_event_builder_pattern() {
        let event = CalendarEvent::new(
            "evt-1",
            "Meeting",
            "2024-01-15T10:00:00Z",
            "2024-01-15T11:00:00Z",
        )
        .with_description("Weekly sync")
        .with_location("Oslo S, Oslo, Norway")
        .in_calendar("work@example.com", "Work", "#0b8043");

        assert_eq!(event.description.as_deref(), Some("Weekly sync"));
        assert_eq!(event.travel_location(), Some("Oslo S, Oslo, Norway"));
        assert_eq!(event.calendar_name, "Work");
    }

    #[test]
    fn blank_location_is_not_a_travel_location() {
        let event = CalendarEvent::new("e", "s", "2024-01-15", "2024-01-16").with_location("  ");
        assert!(event.travel_location().is_none());
    }

    #[test]
    fn start_instant_parses_offsets_and_dates() {
        let event = CalendarEvent::new("e", "s", "2024-01-15T10:00:00+01:00", "x");
        assert_eq!(
            event.start_instant().unwrap().to_rfc3339(),
            "2024-01-15T09:00:00+00:00"
        );

        let all_day = CalendarEvent::new("e", "s", "2024-01-15", "2024-01-16").as_all_day();
        assert_eq!(
            all_day.start_instant().unwrap().to_rfc3339(),
            "2024-01-15T00:00:00+00:00"
        );

        assert!(CalendarEvent::new("e", "s", "soon", "x").start_instant().is_none());
    }

    #[test]
    fn calendar_error_display() {
        assert_eq!(
            CalendarError::ServiceUnavailable.to_string(),
            "Calendar service unavailable"
        );
        assert_eq!(
            CalendarError::AuthenticationExpired.to_string(),
            "Authentication expired"
        );
    }

    #[test]
    fn calendar_event_serializes_camel_case() {
        let event = CalendarEvent::new("evt-1", "Meeting", "2024-01-15", "2024-01-16").as_all_day();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["isAllDay"], true);
        assert_eq!(json["calendarColor"], "#4285f4");
    }
}
