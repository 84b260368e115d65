//! Commute handler
//!
//! `GET /api/commute?lat=..&lon=..` plans routes from the caller's position
//! to their next calendar event that has a location.

use axum::{
    Json,
    extract::{Query, State},
};
use domain::{CommuteData, Coordinate};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Message for a request without a position
pub const MISSING_LOCATION: &str = "Missing location parameters (lat, lon)";

/// Message for a position that is not a valid coordinate
pub const INVALID_LOCATION: &str = "Invalid location coordinates";

/// Query parameters, kept as text so bad numbers get our own message
#[derive(Debug, Default, Deserialize)]
pub struct CommuteQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl CommuteQuery {
    /// The caller's position
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if a parameter is missing, is not a
    /// number, or lies outside the coordinate ranges.
    pub fn origin(&self) -> Result<Coordinate, ApiError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let (Some(lat), Some(lon)) = (present(&self.lat), present(&self.lon)) else {
            return Err(ApiError::BadRequest(MISSING_LOCATION.to_string()));
        };

        let invalid = || ApiError::BadRequest(INVALID_LOCATION.to_string());
        let lat: f64 = lat.parse().map_err(|_| invalid())?;
        let lon: f64 = lon.parse().map_err(|_| invalid())?;
        Coordinate::new(lat, lon).map_err(|_| invalid())
    }
}

/// Routes to the next located event
#[instrument(skip(state))]
pub async fn get_commute(
    State(state): State<AppState>,
    Query(query): Query<CommuteQuery>,
) -> Result<Json<CommuteData>, ApiError> {
    let origin = query.origin()?;

    let data = state
        .commute_service
        .commute_to_next_event(origin)
        .await
        .map_err(|e| {
            if e.needs_auth() {
                warn!(error = %e, "Calendar needs authentication");
            } else {
                warn!(error = %e, retryable = e.is_retryable(), "Commute request failed");
            }
            ApiError::from(e)
        })?;

    Ok(Json(data))
}
