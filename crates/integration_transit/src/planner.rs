//! Arrive-by trip planning
//!
//! [`TripPlanner::plan`] never fails: routes are an enrichment, so every
//! problem is logged and turned into an empty list.

use std::sync::Arc;

use domain::{Coordinate, RouteSummary};
use tracing::{info, instrument, warn};

use crate::client::JourneyPlannerClient;
use crate::config::TransitConfig;
use crate::local_time::{LocalTimePolicy, format_arrival};
use crate::models::TripRequest;
use crate::resolver::AddressResolver;

/// Plans public transit routes to a free-text destination
#[derive(Clone)]
pub struct TripPlanner {
    resolver: AddressResolver,
    client: Arc<dyn JourneyPlannerClient>,
    max_results: u8,
    local_time: LocalTimePolicy,
}

impl std::fmt::Debug for TripPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPlanner")
            .field("resolver", &self.resolver)
            .field("client", &"<JourneyPlannerClient>")
            .field("max_results", &self.max_results)
            .field("local_time", &self.local_time)
            .finish()
    }
}

impl TripPlanner {
    /// Create a planner from a resolver and a journey planner client
    pub fn new(
        resolver: AddressResolver,
        client: Arc<dyn JourneyPlannerClient>,
        config: &TransitConfig,
    ) -> Self {
        Self {
            resolver,
            client,
            max_results: config.max_results,
            local_time: config.local_time,
        }
    }

    /// Routes from `origin` arriving at `destination_address` by `target_arrival`
    ///
    /// `target_arrival` is an ISO 8601 timestamp or date as handed out by the
    /// calendar. Routes keep the journey planner's ranking. An unresolvable
    /// address skips the journey planner entirely.
    #[instrument(skip(self))]
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination_address: &str,
        target_arrival: &str,
    ) -> Vec<RouteSummary> {
        let destination = match self.resolver.resolve(destination_address).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!(error = %e, "Could not geocode destination");
                return Vec::new();
            },
        };

        let date_time = match format_arrival(target_arrival, &self.local_time) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(error = %e, "Unusable arrival time");
                return Vec::new();
            },
        };

        let request = TripRequest::arriving_by(origin, destination, date_time);
        let patterns = match self.client.plan_trip(&request, self.max_results).await {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Route planning failed");
                return Vec::new();
            },
        };

        let routes: Vec<RouteSummary> = patterns
            .iter()
            .enumerate()
            .filter_map(|(index, pattern)| match pattern.to_route_summary() {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!(index, error = %e, "Dropping invalid itinerary");
                    None
                },
            })
            .collect();

        info!(count = routes.len(), "Planned routes");
        routes
    }

    /// Whether the journey planner answers at all
    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::address::AddressMatchingConfig;
    use crate::client::MockJourneyPlannerClient;
    use crate::error::TransitError;
    use crate::geocoding::{GeocodeCandidate, MockGeocodingClient};
    use crate::models::{PatternLeg, TripPattern};

    const ADDRESS: &str = "Acme Hall, Karl Johans gate 1, 0154 Oslo, Norway";

    fn origin() -> Coordinate {
        Coordinate::new(59.91, 10.75).unwrap()
    }

    fn geocoder_hit() -> MockGeocodingClient {
        let mut mock = MockGeocodingClient::new();
        mock.expect_search().returning(|_| {
            Ok(vec![GeocodeCandidate {
                coordinate: Coordinate::new(59.9131, 10.7387).unwrap(),
                label: "Karl Johans gate 1, Oslo".to_string(),
            }])
        });
        mock
    }

    fn planner(geocoder: MockGeocodingClient, client: MockJourneyPlannerClient) -> TripPlanner {
        let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());
        TripPlanner::new(resolver, Arc::new(client), &TransitConfig::for_testing())
    }

    fn pattern(duration_secs: u64, start: &str, end: &str) -> TripPattern {
        TripPattern {
            duration_secs,
            start_time: DateTime::parse_from_rfc3339(start).unwrap(),
            end_time: DateTime::parse_from_rfc3339(end).unwrap(),
            legs: vec![PatternLeg {
                mode: "foot".to_string(),
                duration_secs,
                to_place: "Karl Johans gate 1".to_string(),
                line: None,
            }],
        }
    }

    #[tokio::test]
    async fn plans_arrive_by_in_local_time() {
        let mut client = MockJourneyPlannerClient::new();
        client
            .expect_plan_trip()
            .withf(|request, max| {
                request.arrive_by
                    && request.date_time == "2025-06-15T18:00:00+02:00"
                    && (request.destination.latitude() - 59.9131).abs() < 1e-9
                    && *max == 3
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![pattern(
                    2530,
                    "2025-06-15T17:17:50+02:00",
                    "2025-06-15T18:00:00+02:00",
                )])
            });

        let routes = planner(geocoder_hit(), client)
            .plan(origin(), ADDRESS, "2025-06-15T16:00:00Z")
            .await;

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].total_duration_minutes(), 43);
        assert_eq!(routes[0].legs()[0].instruction(), "Walk to Karl Johans gate 1");
    }

    #[tokio::test]
    async fn unresolvable_destination_skips_planner() {
        let mut geocoder = MockGeocodingClient::new();
        geocoder.expect_search().never();
        let mut client = MockJourneyPlannerClient::new();
        client.expect_plan_trip().never();

        let routes = planner(geocoder, client)
            .plan(origin(), "X", "2025-06-15T16:00:00Z")
            .await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn exhausted_geocoding_skips_planner() {
        let mut geocoder = MockGeocodingClient::new();
        geocoder.expect_search().times(3).returning(|_| Ok(Vec::new()));
        let mut client = MockJourneyPlannerClient::new();
        client.expect_plan_trip().never();

        let routes = planner(geocoder, client)
            .plan(origin(), ADDRESS, "2025-06-15T16:00:00Z")
            .await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn planner_failure_yields_no_routes() {
        let mut client = MockJourneyPlannerClient::new();
        client
            .expect_plan_trip()
            .returning(|_, _| Err(TransitError::RequestFailed("HTTP 500".to_string())));

        let routes = planner(geocoder_hit(), client)
            .plan(origin(), ADDRESS, "2025-06-15T16:00:00Z")
            .await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn bad_arrival_time_skips_planner() {
        let mut client = MockJourneyPlannerClient::new();
        client.expect_plan_trip().never();

        let routes = planner(geocoder_hit(), client)
            .plan(origin(), ADDRESS, "next tuesday")
            .await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn ranking_is_preserved_and_invalid_itineraries_dropped() {
        let mut client = MockJourneyPlannerClient::new();
        client.expect_plan_trip().returning(|_, _| {
            Ok(vec![
                pattern(2700, "2025-06-15T17:15:00+02:00", "2025-06-15T18:00:00+02:00"),
                TripPattern {
                    legs: Vec::new(),
                    ..pattern(600, "2025-06-15T17:50:00+02:00", "2025-06-15T18:00:00+02:00")
                },
                pattern(1200, "2025-06-15T17:40:00+02:00", "2025-06-15T18:00:00+02:00"),
            ])
        });

        let routes = planner(geocoder_hit(), client)
            .plan(origin(), ADDRESS, "2025-06-15T16:00:00Z")
            .await;

        let durations: Vec<u32> = routes.iter().map(RouteSummary::total_duration_minutes).collect();
        assert_eq!(durations, vec![45, 20]);
    }

    #[tokio::test]
    async fn explicit_offset_is_forwarded_unchanged() {
        let mut client = MockJourneyPlannerClient::new();
        client
            .expect_plan_trip()
            .withf(|request, _| request.date_time == "2025-06-15T15:00:00+01:00")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let routes = planner(geocoder_hit(), client)
            .plan(origin(), ADDRESS, "2025-06-15T15:00:00+01:00")
            .await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn health_passes_through() {
        let mut client = MockJourneyPlannerClient::new();
        client.expect_is_healthy().times(1).returning(|| false);

        assert!(!planner(MockGeocodingClient::new(), client).is_healthy().await);
    }
}
