//! Route summaries produced by the trip planner
//!
//! A [`RouteSummary`] is one ranked itinerary reduced to what the dashboard
//! shows: when to leave, when you arrive, how long it takes and the legs in
//! between. Values are immutable once built.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::errors::DomainError;

/// How the route is travelled as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Public transport, possibly with walking legs
    Transit,
    /// Car
    Driving,
    /// On foot only
    Walking,
    /// Bicycle
    Cycling,
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transit => "transit",
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        };
        f.write_str(label)
    }
}

/// One uninterrupted segment of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    /// Upstream transport mode (e.g. "foot", "bus", "rail")
    mode: String,
    /// Human-readable description of the leg
    instruction: String,
    /// Leg duration in whole minutes
    #[serde(rename = "duration")]
    duration_minutes: u32,
}

impl Leg {
    /// Create a leg with an explicit instruction
    pub fn new(
        mode: impl Into<String>,
        instruction: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            mode: mode.into(),
            instruction: instruction.into(),
            duration_minutes,
        }
    }

    /// A vehicle leg, described as "<public code> <line name>"
    pub fn ride(
        mode: impl Into<String>,
        public_code: &str,
        line_name: &str,
        duration_minutes: u32,
    ) -> Self {
        Self::new(mode, format!("{public_code} {line_name}"), duration_minutes)
    }

    /// A leg without a line, described as "Walk to <place>"
    pub fn walk_to(mode: impl Into<String>, place: &str, duration_minutes: u32) -> Self {
        Self::new(mode, format!("Walk to {place}"), duration_minutes)
    }

    /// Upstream transport mode
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Human-readable instruction
    #[must_use]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Duration in whole minutes
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

/// A single ranked itinerary, normalized for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    mode: RouteMode,
    #[serde(rename = "duration")]
    total_duration_minutes: u32,
    depart_by: DateTime<FixedOffset>,
    arrival: DateTime<FixedOffset>,
    #[serde(rename = "steps")]
    legs: Vec<Leg>,
}

impl RouteSummary {
    /// Build a route summary, enforcing its invariants
    ///
    /// Leg durations are not required to add up to the total; upstream
    /// planners round each leg independently.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRoute`] if `legs` is empty or
    /// `depart_by` is later than `arrival`.
    pub fn new(
        mode: RouteMode,
        total_duration_minutes: u32,
        depart_by: DateTime<FixedOffset>,
        arrival: DateTime<FixedOffset>,
        legs: Vec<Leg>,
    ) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::InvalidRoute(
                "a route needs at least one leg".to_string(),
            ));
        }
        if depart_by > arrival {
            return Err(DomainError::InvalidRoute(format!(
                "departure {depart_by} is after arrival {arrival}"
            )));
        }

        Ok(Self {
            mode,
            total_duration_minutes,
            depart_by,
            arrival,
            legs,
        })
    }

    /// Overall mode of the route
    #[must_use]
    pub const fn mode(&self) -> RouteMode {
        self.mode
    }

    /// Total duration in whole minutes
    #[must_use]
    pub const fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    /// Latest time to leave the origin
    #[must_use]
    pub const fn depart_by(&self) -> DateTime<FixedOffset> {
        self.depart_by
    }

    /// Expected arrival at the destination
    #[must_use]
    pub const fn arrival(&self) -> DateTime<FixedOffset> {
        self.arrival
    }

    /// Legs in travel order (never empty)
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn walk() -> Leg {
        Leg::walk_to("foot", "Stortinget", 4)
    }

    #[test]
    fn ride_instruction_joins_code_and_name() {
        let leg = Leg::ride("bus", "31", "Snarøya - Tonsenhagen", 20);
        assert_eq!(leg.instruction(), "31 Snarøya - Tonsenhagen");
        assert_eq!(leg.mode(), "bus");
        assert_eq!(leg.duration_minutes(), 20);
    }

    #[test]
    fn walk_instruction_names_place() {
        assert_eq!(walk().instruction(), "Walk to Stortinget");
    }

    #[test]
    fn route_requires_legs() {
        let result = RouteSummary::new(
            RouteMode::Transit,
            10,
            at("2025-06-15T17:00:00+02:00"),
            at("2025-06-15T17:10:00+02:00"),
            Vec::new(),
        );
        assert!(matches!(result, Err(DomainError::InvalidRoute(_))));
    }

    #[test]
    fn route_rejects_departure_after_arrival() {
        let result = RouteSummary::new(
            RouteMode::Transit,
            10,
            at("2025-06-15T18:00:00+02:00"),
            at("2025-06-15T17:10:00+02:00"),
            vec![walk()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn route_allows_equal_times() {
        let t = at("2025-06-15T18:00:00+02:00");
        assert!(RouteSummary::new(RouteMode::Walking, 0, t, t, vec![walk()]).is_ok());
    }

    #[test]
    fn route_compares_instants_across_offsets() {
        // 16:30Z is 18:30+02:00, so this departs before it arrives
        let result = RouteSummary::new(
            RouteMode::Transit,
            30,
            at("2025-06-15T16:00:00Z"),
            at("2025-06-15T18:30:00+02:00"),
            vec![walk()],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn route_serializes_with_dashboard_names() {
        let route = RouteSummary::new(
            RouteMode::Transit,
            43,
            at("2025-06-15T17:17:00+02:00"),
            at("2025-06-15T18:00:00+02:00"),
            vec![walk(), Leg::ride("metro", "2", "Ellingsrudåsen", 30)],
        )
        .unwrap();

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["mode"], "transit");
        assert_eq!(json["duration"], 43);
        assert_eq!(json["departBy"], "2025-06-15T17:17:00+02:00");
        assert_eq!(json["arrival"], "2025-06-15T18:00:00+02:00");
        assert_eq!(json["steps"][1]["instruction"], "2 Ellingsrudåsen");
        assert_eq!(json["steps"][1]["duration"], 30);
    }

    #[test]
    fn route_mode_display() {
        assert_eq!(RouteMode::Transit.to_string(), "transit");
        assert_eq!(RouteMode::Cycling.to_string(), "cycling");
    }
}
