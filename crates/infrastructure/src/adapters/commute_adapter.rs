//! Commute adapter - Implements CommutePort using integration_transit

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::CommutePort;
use async_trait::async_trait;
use domain::{Coordinate, RouteSummary};
use integration_transit::{
    AddressMatchingConfig, AddressResolver, EnturGeocodingClient, EnturJourneyPlannerClient,
    GeocoderConfig, TransitConfig, TripPlanner,
};
use tracing::{debug, instrument};

/// Adapter for public transit routing via the Entur geocoder and journey planner
#[derive(Debug, Clone)]
pub struct CommuteAdapter {
    planner: TripPlanner,
}

impl CommuteAdapter {
    /// Wrap an already assembled trip planner
    pub const fn new(planner: TripPlanner) -> Self {
        Self { planner }
    }

    /// Build the Entur clients and planner from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client fails to initialize.
    pub fn from_config(
        transit: &TransitConfig,
        geocoding: &GeocoderConfig,
        matching: &AddressMatchingConfig,
    ) -> Result<Self, ApplicationError> {
        let geocoder = EnturGeocodingClient::new(geocoding)
            .map_err(|e| ApplicationError::Configuration(format!("geocoder: {e}")))?;
        let client = EnturJourneyPlannerClient::new(transit)
            .map_err(|e| ApplicationError::Configuration(format!("journey planner: {e}")))?;

        let resolver = AddressResolver::new(Arc::new(geocoder), matching.clone());
        Ok(Self::new(TripPlanner::new(resolver, Arc::new(client), transit)))
    }
}

#[async_trait]
impl CommutePort for CommuteAdapter {
    #[instrument(skip(self))]
    async fn plan_routes(
        &self,
        origin: Coordinate,
        destination: &str,
        target_arrival: &str,
    ) -> Vec<RouteSummary> {
        let routes = self.planner.plan(origin, destination, target_arrival).await;
        debug!(count = routes.len(), "Commute routes planned");
        routes
    }

    async fn is_available(&self) -> bool {
        self.planner.is_healthy().await
    }
}
