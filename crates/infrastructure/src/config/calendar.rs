//! Calendar source and commute mode configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Where upcoming events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSource {
    /// Google Calendar API with a bearer token
    Google,
    /// One configured event, a fixed number of days ahead
    #[default]
    Fixed,
    /// Canned demo scenarios
    Mock,
}

/// Calendar configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarAppConfig {
    /// Active calendar source
    #[serde(default)]
    pub source: CalendarSource,

    /// Google Calendar settings
    #[serde(default)]
    pub google: GoogleCalendarConfig,

    /// The event used by the fixed source
    #[serde(default)]
    pub fixed_event: FixedEventConfig,

    /// Scenario id used by the mock source
    #[serde(default = "default_mock_scenario")]
    pub mock_scenario: String,
}

fn default_mock_scenario() -> String {
    "noEvents".to_string()
}

/// Google Calendar API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCalendarConfig {
    /// API root
    #[serde(default = "default_google_base_url")]
    pub base_url: String,

    /// OAuth access token (prefer env var HOMEBOY_CALENDAR__GOOGLE__ACCESS_TOKEN)
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Upcoming events fetched per calendar
    #[serde(default = "default_max_results_per_calendar")]
    pub max_results_per_calendar: u32,

    /// Request timeout in seconds
    #[serde(default = "default_google_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_google_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

const fn default_max_results_per_calendar() -> u32 {
    10
}

const fn default_google_timeout_secs() -> u64 {
    10
}

impl Default for GoogleCalendarConfig {
    fn default() -> Self {
        Self {
            base_url: default_google_base_url(),
            access_token: None,
            max_results_per_calendar: default_max_results_per_calendar(),
            timeout_secs: default_google_timeout_secs(),
        }
    }
}

/// A single test event in the travel region's local time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedEventConfig {
    /// Event title
    #[serde(default = "default_fixed_summary")]
    pub summary: String,

    /// Free-text location
    #[serde(default = "default_fixed_location")]
    pub location: String,

    /// Days from today
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,

    /// Local start hour
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,

    /// Local start minute
    #[serde(default)]
    pub start_minute: u32,

    /// Event length in minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

fn default_fixed_summary() -> String {
    "Test Event at Asker".to_string()
}

fn default_fixed_location() -> String {
    "Asker stasjon, Asker, Norway".to_string()
}

const fn default_days_ahead() -> u32 {
    1
}

const fn default_start_hour() -> u32 {
    15
}

const fn default_duration_minutes() -> u32 {
    120
}

impl Default for FixedEventConfig {
    fn default() -> Self {
        Self {
            summary: default_fixed_summary(),
            location: default_fixed_location(),
            days_ahead: default_days_ahead(),
            start_hour: default_start_hour(),
            start_minute: 0,
            duration_minutes: default_duration_minutes(),
        }
    }
}

impl CalendarAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.source == CalendarSource::Google && self.google.base_url.is_empty() {
            return Err("calendar.google.base_url must not be empty".to_string());
        }
        if self.google.max_results_per_calendar == 0 {
            return Err("calendar.google.max_results_per_calendar must be greater than 0".to_string());
        }
        if self.fixed_event.start_hour > 23 || self.fixed_event.start_minute > 59 {
            return Err("calendar.fixed_event start time is out of range".to_string());
        }
        Ok(())
    }
}

/// Commute endpoint behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommuteConfig {
    /// Serve synthetic routes instead of calling the journey planner
    #[serde(default)]
    pub use_mocks: bool,
}
