//! Entur geocoding client
//!
//! Runs one fuzzy free-text search against the
//! [Entur geocoder](https://developer.entur.org/pages-geocoder-intro)
//! autocomplete endpoint and returns the ranked GeoJSON features.
//!
//! Results are never cached: every planning request geocodes afresh.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::default_client_name;

/// Configuration for the geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Autocomplete endpoint of the geocoder
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Value sent in the `ET-Client-Name` header
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Connection timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of features requested per search
    #[serde(default = "default_size")]
    pub size: u8,

    /// Language hint for labels
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_geocoding_base_url() -> String {
    "https://api.entur.io/geocoder/v1/autocomplete".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

const fn default_size() -> u8 {
    5
}

fn default_lang() -> String {
    "no".to_string()
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            client_name: default_client_name(),
            timeout_secs: default_geocoding_timeout_secs(),
            size: default_size(),
            lang: default_lang(),
        }
    }
}

impl GeocoderConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("geocoder base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("geocoder timeout_secs must be greater than 0".to_string());
        }
        if self.size == 0 {
            return Err("geocoder size must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Empty search text
    #[error("Geocoding query must not be empty")]
    EmptyQuery,

    /// Rate limit exceeded
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

/// One ranked geocoding hit
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Location of the feature
    pub coordinate: Coordinate,
    /// Display label, empty if the service sent none
    pub label: String,
}

/// Trait for geocoding clients
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Search for a free-text address, best match first
    ///
    /// An empty vector means the service understood the query but found
    /// nothing.
    async fn search(&self, text: &str) -> Result<Vec<GeocodeCandidate>, GeocodingError>;
}

/// Entur autocomplete geocoding client
#[derive(Debug)]
pub struct EnturGeocodingClient {
    client: Client,
    config: GeocoderConfig,
}

impl EnturGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("homeboy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the GeoJSON feature collection into candidates
    ///
    /// Features with missing or out-of-range coordinates are skipped.
    fn parse_features(body: &str) -> Result<Vec<GeocodeCandidate>, GeocodingError> {
        let raw: RawFeatureCollection =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let candidates = raw
            .features
            .into_iter()
            .filter_map(|feature| {
                let label = feature
                    .properties
                    .and_then(|p| p.label)
                    .unwrap_or_default();
                let coordinates = feature
                    .geometry
                    .map(|g| g.coordinates)
                    .unwrap_or_default();
                match Coordinate::from_geojson(&coordinates) {
                    Ok(coordinate) => Some(GeocodeCandidate { coordinate, label }),
                    Err(e) => {
                        warn!(%label, %e, "Skipping feature with bad coordinates");
                        None
                    },
                }
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl GeocodingClient for EnturGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, text: &str) -> Result<Vec<GeocodeCandidate>, GeocodingError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GeocodingError::EmptyQuery);
        }

        let params = [
            ("text", text.to_string()),
            ("size", self.config.size.to_string()),
            ("lang", self.config.lang.clone()),
        ];

        let response = self
            .client
            .get(&self.config.base_url)
            .header("ET-Client-Name", self.config.client_name.as_str())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let candidates = Self::parse_features(&body)?;
        debug!(%text, count = candidates.len(), "Geocoder answered");
        Ok(candidates)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    properties: Option<RawProperties>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    label: Option<String>,
}
