//! Commute service
//!
//! Finds the next calendar event that has somewhere to travel to and plans
//! routes arriving there by its start time.

use std::{fmt, sync::Arc};

use domain::{CommuteData, Coordinate};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CalendarEvent, CalendarPort, CommutePort},
    services::mock_commute::mock_commute_data,
};

/// Message for "no event to travel to"
pub const NO_UPCOMING_EVENTS: &str = "No upcoming events with locations";

/// Message for "event found, but no route to it"
pub const NO_ROUTES_FOUND: &str = "No routes found";

/// The earliest event with a travel location
///
/// Events are ordered by start; events whose start cannot be read sort last
/// and keep their relative order.
pub fn next_event_with_location(mut events: Vec<CalendarEvent>) -> Option<CalendarEvent> {
    events.sort_by_key(|event| {
        let instant = event.start_instant();
        (instant.is_none(), instant)
    });
    events
        .into_iter()
        .find(|event| event.travel_location().is_some())
}

/// Commute service for the dashboard's "next event" card
pub struct CommuteService {
    calendar_port: Arc<dyn CalendarPort>,
    commute_port: Arc<dyn CommutePort>,
    use_mocks: bool,
}

impl fmt::Debug for CommuteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommuteService")
            .field("use_mocks", &self.use_mocks)
            .finish_non_exhaustive()
    }
}

impl CommuteService {
    /// Create a new commute service
    pub fn new(calendar_port: Arc<dyn CalendarPort>, commute_port: Arc<dyn CommutePort>) -> Self {
        Self {
            calendar_port,
            commute_port,
            use_mocks: false,
        }
    }

    /// Serve synthetic routes instead of asking the routing port
    #[must_use]
    pub const fn with_mock_routes(mut self, use_mocks: bool) -> Self {
        self.use_mocks = use_mocks;
        self
    }

    /// Routes from `origin` to the next upcoming event with a location
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::NotFound`] when there is no such event, or no
    ///   route to it
    /// - [`ApplicationError::NotAuthenticated`] /
    ///   [`ApplicationError::AuthenticationExpired`] from the calendar
    /// - [`ApplicationError::ExternalService`] for other calendar failures
    #[instrument(skip(self))]
    pub async fn commute_to_next_event(
        &self,
        origin: Coordinate,
    ) -> Result<CommuteData, ApplicationError> {
        let events = self.calendar_port.upcoming_events().await?;
        debug!(count = events.len(), "Fetched upcoming events");

        let Some(event) = next_event_with_location(events) else {
            info!("No upcoming events with a location");
            return Err(ApplicationError::NotFound(NO_UPCOMING_EVENTS.to_string()));
        };

        if self.use_mocks {
            debug!(event = %event.summary, "Using mock routes");
            return mock_commute_data(&event).map_err(ApplicationError::from);
        }

        let destination = event.travel_location().unwrap_or_default();
        info!(event = %event.summary, %destination, start = %event.start, "Planning commute");

        let routes = self
            .commute_port
            .plan_routes(origin, destination, &event.start)
            .await;

        if routes.is_empty() {
            warn!(%destination, "No routes found");
            return Err(ApplicationError::NotFound(NO_ROUTES_FOUND.to_string()));
        }

        Ok(CommuteData {
            destination: destination.to_string(),
            departure_time: event.start.clone(),
            routes,
            event_summary: event.summary,
        })
    }

    /// Whether the routing backend is reachable
    ///
    /// Always ready when serving mock routes.
    pub async fn is_ready(&self) -> bool {
        self.use_mocks || self.commute_port.is_available().await
    }
}
