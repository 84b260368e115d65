//! Address resolution with ordered fallback strategies
//!
//! Strategies are tried one at a time; the first one for which the geocoder
//! returns any feature wins and no further requests are made. Requests are
//! deliberately sequential: the strategies are ordered by confidence, so a
//! later hit never beats an earlier one.

use std::sync::Arc;

use domain::Coordinate;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::address::{AddressMatchingConfig, search_strategies};
use crate::geocoding::GeocodingClient;

/// The address could not be turned into a coordinate
///
/// Not a transient error: retrying the same address will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    /// Nothing to resolve
    #[error("Destination address is empty")]
    EmptyAddress,

    /// No strategy could build a usable query
    #[error("No usable search text in address: {address}")]
    NoSearchText {
        /// The address as given
        address: String,
    },

    /// Every strategy was tried without a match
    #[error("Failed to geocode '{address}' after {attempts} attempts")]
    Exhausted {
        /// The address as given
        address: String,
        /// Number of geocoder requests made
        attempts: usize,
    },
}

/// Resolves free-text destinations to coordinates
#[derive(Clone)]
pub struct AddressResolver {
    geocoder: Arc<dyn GeocodingClient>,
    matching: AddressMatchingConfig,
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver")
            .field("geocoder", &"<GeocodingClient>")
            .field("matching", &self.matching)
            .finish()
    }
}

impl AddressResolver {
    /// Create a resolver over a geocoding client and a gazetteer
    pub fn new(geocoder: Arc<dyn GeocodingClient>, matching: AddressMatchingConfig) -> Self {
        Self { geocoder, matching }
    }

    /// Resolve an address to the coordinate of its best geocoding match
    ///
    /// The best match is the highest-ranked feature with usable coordinates.
    /// Features the geocoder ranked higher but returned without a valid
    /// position are passed over, so the match can be a lower-ranked one.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionFailure`] when the address is empty, yields no
    /// search text, or no strategy produced a match. Failed or empty
    /// geocoder answers for one strategy only move on to the next.
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Coordinate, ResolutionFailure> {
        if address.trim().is_empty() {
            return Err(ResolutionFailure::EmptyAddress);
        }

        let strategies = search_strategies(address, &self.matching);
        if strategies.is_empty() {
            warn!(%address, "No search text could be extracted");
            return Err(ResolutionFailure::NoSearchText {
                address: address.to_string(),
            });
        }

        let total = strategies.len();
        for (index, strategy) in strategies.iter().enumerate() {
            debug!(
                kind = ?strategy.kind,
                "[{}/{total}] Geocoding: \"{}\"",
                index + 1,
                strategy.query
            );

            match self.geocoder.search(&strategy.query).await {
                Ok(candidates) => {
                    if let Some(best) = candidates.into_iter().next() {
                        info!(
                            label = %best.label,
                            latitude = best.coordinate.latitude(),
                            longitude = best.coordinate.longitude(),
                            "Resolved destination"
                        );
                        return Ok(best.coordinate);
                    }
                    debug!(query = %strategy.query, "No results");
                },
                Err(e) => {
                    warn!(query = %strategy.query, error = %e, "Geocoding attempt failed");
                },
            }
        }

        warn!(%address, attempts = total, "Failed to geocode destination");
        Err(ResolutionFailure::Exhausted {
            address: address.to_string(),
            attempts: total,
        })
    }
}
