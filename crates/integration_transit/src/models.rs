//! Journey planner data models
//!
//! Typed representations of an arrive-by trip request and the itineraries
//! (trip patterns) the Entur journey planner returns for it.

use chrono::{DateTime, FixedOffset};
use domain::{Coordinate, DomainError, Leg, RouteMode, RouteSummary};
use serde::{Deserialize, Serialize};

/// An arrive-by trip query between two resolved points
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    /// Where the traveller starts
    pub origin: Coordinate,
    /// Resolved destination
    pub destination: Coordinate,
    /// Target time, already in local time with an explicit UTC offset
    pub date_time: String,
    /// Whether `date_time` is the latest acceptable arrival
    pub arrive_by: bool,
}

impl TripRequest {
    /// Ask for itineraries arriving at or before `date_time`
    pub fn arriving_by(
        origin: Coordinate,
        destination: Coordinate,
        date_time: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            destination,
            date_time: date_time.into(),
            arrive_by: true,
        }
    }
}

/// A single line (route) a vehicle leg runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRef {
    /// Short public code, e.g. "31" or "RE10"
    pub public_code: String,
    /// Line name, e.g. "Snarøya - Fornebu - Tonsenhagen"
    pub name: String,
}

/// One leg of an upstream itinerary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLeg {
    /// Upstream transport mode ("foot", "bus", "rail", ...)
    pub mode: String,
    /// Leg duration in seconds
    pub duration_secs: u64,
    /// Name of the place the leg ends at
    pub to_place: String,
    /// Line for vehicle legs, `None` for walking
    pub line: Option<LineRef>,
}

impl PatternLeg {
    fn to_leg(&self) -> Leg {
        let minutes = minutes_ceil(self.duration_secs);
        match &self.line {
            Some(line) => Leg::ride(&*self.mode, &line.public_code, &line.name, minutes),
            None => Leg::walk_to(&*self.mode, &self.to_place, minutes),
        }
    }
}

/// One ranked itinerary as returned by the journey planner
#[derive(Debug, Clone, PartialEq)]
pub struct TripPattern {
    /// Total duration in seconds
    pub duration_secs: u64,
    /// Departure time of the first leg
    pub start_time: DateTime<FixedOffset>,
    /// Arrival time of the last leg
    pub end_time: DateTime<FixedOffset>,
    /// Legs in travel order
    pub legs: Vec<PatternLeg>,
}

impl TripPattern {
    /// Normalize into a display route
    ///
    /// Durations are rounded up to whole minutes; start and end times are
    /// kept as sent.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRoute`] when the itinerary has no legs
    /// or ends before it starts.
    pub fn to_route_summary(&self) -> Result<RouteSummary, DomainError> {
        RouteSummary::new(
            RouteMode::Transit,
            minutes_ceil(self.duration_secs),
            self.start_time,
            self.end_time,
            self.legs.iter().map(PatternLeg::to_leg).collect(),
        )
    }
}

/// Whole minutes, rounding any started minute up
#[must_use]
pub fn minutes_ceil(secs: u64) -> u32 {
    u32::try_from(secs.div_ceil(60)).unwrap_or(u32::MAX)
}
