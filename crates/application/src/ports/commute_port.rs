//! Commute routing port
//!
//! Turns an origin, a free-text destination and a target arrival time into
//! ranked routes. Implemented in the infrastructure layer on top of the
//! transit integration.

use async_trait::async_trait;
use domain::{Coordinate, RouteSummary};
#[cfg(test)]
use mockall::automock;

/// Port for arrive-by route planning
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommutePort: Send + Sync {
    /// Routes arriving at `destination` by `target_arrival`, best first
    ///
    /// Never fails: an empty list means no usable route could be found,
    /// whatever the reason.
    async fn plan_routes(
        &self,
        origin: Coordinate,
        destination: &str,
        target_arrival: &str,
    ) -> Vec<RouteSummary>;

    /// Check if the routing backend is reachable
    async fn is_available(&self) -> bool;
}
