//! Entur journey planner client
//!
//! Runs arrive-by trip queries against the
//! [Entur Journey Planner v3](https://developer.entur.org/pages-journeyplanner-journeyplanner)
//! GraphQL endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::config::TransitConfig;
use crate::error::TransitError;
use crate::models::{LineRef, PatternLeg, TripPattern, TripRequest};

const TRIP_QUERY: &str = r"
query TripQuery($from: Location!, $to: Location!, $dateTime: DateTime!, $arriveBy: Boolean!, $numTripPatterns: Int!) {
  trip(from: $from, to: $to, dateTime: $dateTime, arriveBy: $arriveBy, numTripPatterns: $numTripPatterns) {
    tripPatterns {
      duration
      startTime
      endTime
      legs {
        mode
        duration
        fromPlace { name }
        toPlace { name }
        line { publicCode name }
      }
    }
  }
}";

const HEALTH_QUERY: &str = "{ __typename }";

/// Trait for journey planner clients
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JourneyPlannerClient: Send + Sync {
    /// Ask for up to `max_results` ranked itineraries, best first
    async fn plan_trip(
        &self,
        request: &TripRequest,
        max_results: u8,
    ) -> Result<Vec<TripPattern>, TransitError>;

    /// Check if the journey planner is reachable
    async fn is_healthy(&self) -> bool;
}

/// GraphQL client for the Entur journey planner
#[derive(Debug)]
pub struct EnturJourneyPlannerClient {
    client: Client,
    config: TransitConfig,
}

impl EnturJourneyPlannerClient {
    /// Create a new journey planner client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("homeboy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// GraphQL variables for a trip request
    fn trip_variables(request: &TripRequest, max_results: u8) -> Value {
        json!({
            "from": {
                "coordinates": {
                    "latitude": request.origin.latitude(),
                    "longitude": request.origin.longitude(),
                }
            },
            "to": {
                "coordinates": {
                    "latitude": request.destination.latitude(),
                    "longitude": request.destination.longitude(),
                }
            },
            "dateTime": request.date_time,
            "arriveBy": request.arrive_by,
            "numTripPatterns": max_results,
        })
    }

    /// POST a GraphQL document and return the raw response body
    async fn post_graphql(&self, query: &str, variables: Value) -> Result<String, TransitError> {
        let payload = json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.config.base_url)
            .header("ET-Client-Name", self.config.client_name.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransitError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    TransitError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(TransitError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(TransitError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| TransitError::ParseError(e.to_string()))
    }

    /// Parse a trip response into typed patterns
    ///
    /// A non-empty `errors` array fails the whole response. A single pattern
    /// that cannot be read is skipped so the rest keep their ranking.
    fn parse_trip_response(body: &str) -> Result<Vec<TripPattern>, TransitError> {
        let raw: RawResponse =
            serde_json::from_str(body).map_err(|e| TransitError::ParseError(e.to_string()))?;

        if let Some(first) = raw.errors.first() {
            return Err(TransitError::QueryFailed(first.message.clone()));
        }

        let patterns = raw
            .data
            .and_then(|data| data.trip)
            .map(|trip| trip.trip_patterns)
            .unwrap_or_default();

        Ok(patterns
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<RawTripPattern>(value) {
                    Ok(raw) => Some(Self::convert_pattern(raw)),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping unreadable trip pattern");
                        None
                    },
                }
            })
            .collect())
    }

    fn convert_pattern(raw: RawTripPattern) -> TripPattern {
        TripPattern {
            duration_secs: raw.duration,
            start_time: raw.start_time,
            end_time: raw.end_time,
            legs: raw.legs.into_iter().map(Self::convert_leg).collect(),
        }
    }

    fn convert_leg(raw: RawLeg) -> PatternLeg {
        PatternLeg {
            mode: raw.mode,
            duration_secs: raw.duration,
            to_place: raw.to_place.and_then(|p| p.name).unwrap_or_default(),
            line: raw.line.map(|line| LineRef {
                public_code: line.public_code.unwrap_or_default(),
                name: line.name.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl JourneyPlannerClient for EnturJourneyPlannerClient {
    #[instrument(skip(self, request), fields(
        from = %request.origin,
        to = %request.destination,
        date_time = %request.date_time,
    ))]
    async fn plan_trip(
        &self,
        request: &TripRequest,
        max_results: u8,
    ) -> Result<Vec<TripPattern>, TransitError> {
        let variables = Self::trip_variables(request, max_results);
        debug!(url = %self.config.base_url, "Requesting trip");

        let body = self.post_graphql(TRIP_QUERY, variables).await?;
        let patterns = Self::parse_trip_response(&body)?;

        if patterns.is_empty() {
            warn!("No trip patterns found");
        }
        debug!(count = patterns.len(), "Trip patterns found");
        Ok(patterns)
    }

    async fn is_healthy(&self) -> bool {
        self.post_graphql(HEALTH_QUERY, json!({})).await.is_ok()
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawResponse {
    data: Option<RawData>,
    #[serde(default)]
    errors: Vec<RawGraphqlError>,
}

#[derive(Debug, Deserialize)]
struct RawGraphqlError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawData {
    trip: Option<RawTrip>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrip {
    #[serde(default)]
    trip_patterns: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTripPattern {
    duration: u64,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    mode: String,
    duration: u64,
    to_place: Option<RawPlace>,
    line: Option<RawLine>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLine {
    public_code: Option<String>,
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use domain::Coordinate;

    use super::*;

    const SAMPLE: &str = r#"{
        "data": {
            "trip": {
                "tripPatterns": [
                    {
                        "duration": 2530,
                        "startTime": "2025-06-15T17:17:50+02:00",
                        "endTime": "2025-06-15T18:00:00+02:00",
                        "legs": [
                            {
                                "mode": "foot",
                                "duration": 240,
                                "fromPlace": { "name": "Origin" },
                                "toPlace": { "name": "Jernbanetorget" },
                                "line": null
                            },
                            {
                                "mode": "metro",
                                "duration": 1800,
                                "fromPlace": { "name": "Jernbanetorget" },
                                "toPlace": { "name": "Stortinget" },
                                "line": { "publicCode": "2", "name": "Ellingsrudåsen - Østerås" }
                            }
                        ]
                    },
                    {
                        "duration": 2700,
                        "startTime": "2025-06-15T17:15:00+02:00",
                        "endTime": "2025-06-15T17:59:00+02:00",
                        "legs": [
                            { "mode": "foot", "duration": 2700, "toPlace": { "name": "Destination" } }
                        ]
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_trip_response() {
        let patterns = EnturJourneyPlannerClient::parse_trip_response(SAMPLE).unwrap();
        assert_eq!(patterns.len(), 2);

        let first = &patterns[0];
        assert_eq!(first.duration_secs, 2530);
        assert_eq!(first.start_time.to_rfc3339(), "2025-06-15T17:17:50+02:00");
        assert_eq!(first.legs.len(), 2);
        assert!(first.legs[0].line.is_none());
        assert_eq!(first.legs[0].to_place, "Jernbanetorget");
        let line = first.legs[1].line.as_ref().unwrap();
        assert_eq!(line.public_code, "2");
        assert_eq!(line.name, "Ellingsrudåsen - Østerås");

        assert_eq!(patterns[1].duration_secs, 2700);
    }

    #[test]
    fn test_graphql_errors_fail_the_response() {
        let body = r#"{"errors":[{"message":"Variable 'dateTime' has an invalid value"}],"data":null}"#;
        let result = EnturJourneyPlannerClient::parse_trip_response(body);
        assert!(matches!(result, Err(TransitError::QueryFailed(msg)) if msg.contains("dateTime")));
    }

    #[test]
    fn test_missing_trip_is_empty() {
        let body = r#"{"data":{"trip":null}}"#;
        assert!(
            EnturJourneyPlannerClient::parse_trip_response(body)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unreadable_pattern_is_skipped() {
        let body = r#"{"data":{"trip":{"tripPatterns":[
            {"duration": 600, "startTime": "not a time", "endTime": "2025-06-15T18:00:00+02:00", "legs": []},
            {"duration": 600, "startTime": "2025-06-15T17:50:00+02:00", "endTime": "2025-06-15T18:00:00+02:00",
             "legs": [{"mode": "foot", "duration": 600, "toPlace": {"name": "Stop"}}]}
        ]}}}"#;

        let patterns = EnturJourneyPlannerClient::parse_trip_response(body).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].legs[0].to_place, "Stop");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            EnturJourneyPlannerClient::parse_trip_response("<html>"),
            Err(TransitError::ParseError(_))
        ));
    }

    #[test]
    fn test_trip_variables() {
        let request = TripRequest::arriving_by(
            Coordinate::new(59.91, 10.75).unwrap(),
            Coordinate::new(59.9131, 10.7387).unwrap(),
            "2025-06-15T18:00:00+02:00",
        );
        let vars = EnturJourneyPlannerClient::trip_variables(&request, 3);

        assert_eq!(vars["from"]["coordinates"]["latitude"], 59.91);
        assert_eq!(vars["to"]["coordinates"]["longitude"], 10.7387);
        assert_eq!(vars["dateTime"], "2025-06-15T18:00:00+02:00");
        assert_eq!(vars["arriveBy"], true);
        assert_eq!(vars["numTripPatterns"], 3);
    }
}
