//! Commute payload returned to the dashboard

use serde::Serialize;

use super::route::RouteSummary;

/// Ranked routes to the next event, with the event's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuteData {
    /// Destination address as written in the calendar event
    pub destination: String,
    /// Event start time, verbatim from the calendar
    pub departure_time: String,
    /// Routes in the planner's ranking order
    pub routes: Vec<RouteSummary>,
    /// Event title
    pub event_summary: String,
}
