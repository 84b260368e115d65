//! Commute routing for Homeboy
//!
//! Turns a calendar event's free-text location and start time into ranked
//! public transit routes, using the [Entur](https://developer.entur.org)
//! geocoder and journey planner (GraphQL).
//!
//! # Architecture
//!
//! The crate follows the client-trait pattern used by the other integration
//! crates. [`GeocodingClient`] performs one fuzzy address search and is
//! implemented by [`EnturGeocodingClient`]. [`AddressResolver`] drives it with
//! an ordered list of address clean-up strategies and stops at the first hit.
//! [`JourneyPlannerClient`] runs one arrive-by trip query and is implemented
//! by [`EnturJourneyPlannerClient`]. [`TripPlanner`] composes the two and
//! degrades every failure to an empty route list.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use integration_transit::*;
//!
//! let geocoder = EnturGeocodingClient::new(&GeocoderConfig::default())?;
//! let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());
//! let client = EnturJourneyPlannerClient::new(&TransitConfig::default())?;
//! let planner = TripPlanner::new(resolver, Arc::new(client), &TransitConfig::default());
//!
//! let routes = planner
//!     .plan(origin, "Acme Hall, Karl Johans gate 1, 0154 Oslo, Norway", "2025-06-15T16:00:00Z")
//!     .await;
//! ```

mod address;
mod client;
mod config;
mod error;
mod geocoding;
mod local_time;
mod models;
mod planner;
mod resolver;

pub use address::{AddressMatchingConfig, SearchStrategy, StrategyKind, search_strategies};
pub use client::{EnturJourneyPlannerClient, JourneyPlannerClient};
pub use config::TransitConfig;
pub use error::TransitError;
pub use geocoding::{
    EnturGeocodingClient, GeocodeCandidate, GeocoderConfig, GeocodingClient, GeocodingError,
};
pub use local_time::{LocalTimePolicy, format_arrival};
pub use models::{LineRef, PatternLeg, TripPattern, TripRequest, minutes_ceil};
pub use planner::TripPlanner;
pub use resolver::{AddressResolver, ResolutionFailure};
