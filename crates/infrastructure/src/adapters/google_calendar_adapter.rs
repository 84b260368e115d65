//! Google Calendar adapter - Implements CalendarPort via the Google Calendar API v3
//!
//! Lists every calendar of the signed-in user, then fetches upcoming single
//! events from all of them in parallel. Token acquisition is not handled
//! here; the adapter only stores a bearer token and forgets it once Google
//! reports it as expired or revoked.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{CalendarError, CalendarEvent, CalendarPort};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GoogleCalendarConfig;

const DEFAULT_COLOR: &str = "#4285f4";

#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListEntry {
    id: String,
    summary: Option<String>,
    background_color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

impl GoogleEvent {
    /// `None` when the event lacks a usable start or end
    fn into_calendar_event(self, calendar: &CalendarListEntry) -> Option<CalendarEvent> {
        let start = self.start.as_ref()?;
        let end = self.end.as_ref()?;
        let is_all_day = start.date_time.is_none();

        let mut event = CalendarEvent::new(
            self.id,
            self.summary.unwrap_or_else(|| "Untitled Event".to_string()),
            start.value()?,
            end.value()?,
        )
        .in_calendar(
            calendar.id.clone(),
            calendar
                .summary
                .clone()
                .unwrap_or_else(|| "Unnamed Calendar".to_string()),
            calendar
                .background_color
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        );

        event.description = self.description;
        event.location = self.location;
        if is_all_day {
            event = event.as_all_day();
        }
        Some(event)
    }
}

/// Adapter for the Google Calendar REST API
pub struct GoogleCalendarAdapter {
    client: Client,
    base_url: String,
    max_results: u32,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for GoogleCalendarAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarAdapter")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

impl GoogleCalendarAdapter {
    /// Create a new adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &GoogleCalendarConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApplicationError::Configuration(format!("calendar client: {e}")))?;

        let token = config
            .access_token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_string()));

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results_per_calendar,
            token: RwLock::new(token),
        })
    }

    /// Forget the stored access token
    pub fn clear_token(&self) {
        self.token.write().take();
    }

    /// Whether an access token is stored
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::OperationFailed(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| CalendarError::OperationFailed("base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self, token))]
    async fn fetch_calendars(&self, token: &str) -> Result<Vec<CalendarListEntry>, CalendarError> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("showHidden", "true")])
            .send()
            .await
            .map_err(|e| CalendarError::OperationFailed(format!("calendar list: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED || body.contains("invalid_grant") {
                return Err(CalendarError::AuthenticationExpired);
            }
            if status.is_server_error() {
                warn!(%status, "Calendar service error");
                return Err(CalendarError::ServiceUnavailable);
            }
            return Err(CalendarError::OperationFailed(format!(
                "calendar list returned HTTP {status}"
            )));
        }

        let list: CalendarListResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::OperationFailed(format!("calendar list: {e}")))?;
        Ok(list.items)
    }

    #[instrument(skip(self, token, calendar), fields(calendar = %calendar.id))]
    async fn fetch_events(
        &self,
        token: &str,
        calendar: &CalendarListEntry,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let url = self.endpoint(&["calendars", &calendar.id, "events"])?;
        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", max_results.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .map_err(|e| CalendarError::OperationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalendarError::OperationFailed(format!("HTTP {status}")));
        }

        let events: EventsResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::OperationFailed(e.to_string()))?;

        let total = events.items.len();
        let converted: Vec<CalendarEvent> = events
            .items
            .into_iter()
            .filter_map(|event| event.into_calendar_event(calendar))
            .collect();
        if converted.len() < total {
            debug!(skipped = total - converted.len(), "Skipped events without start or end");
        }
        Ok(converted)
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarAdapter {
    #[instrument(skip(self))]
    async fn upcoming_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let Some(token) = self.current_token() else {
            return Err(CalendarError::NotAuthenticated);
        };

        let calendars = match self.fetch_calendars(&token).await {
            Ok(calendars) => calendars,
            Err(CalendarError::AuthenticationExpired) => {
                warn!("Google token expired or revoked, clearing it");
                self.clear_token();
                return Err(CalendarError::AuthenticationExpired);
            },
            Err(e) => return Err(e),
        };
        debug!(count = calendars.len(), "Fetched calendar list");

        let results = join_all(
            calendars
                .iter()
                .map(|calendar| self.fetch_events(&token, calendar)),
        )
        .await;

        let mut events = Vec::new();
        for (calendar, result) in calendars.iter().zip(results) {
            match result {
                Ok(found) => events.extend(found),
                Err(e) => warn!(calendar = %calendar.id, error = %e, "Skipping calendar"),
            }
        }

        info!(count = events.len(), calendars = calendars.len(), "Fetched upcoming events");
        Ok(events)
    }

    async fn is_available(&self) -> bool {
        self.has_token()
    }
}
