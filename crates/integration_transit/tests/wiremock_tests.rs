//! Integration tests for geocoding and trip planning (wiremock-based)

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain::Coordinate;
use integration_transit::{
    AddressMatchingConfig, AddressResolver, EnturGeocodingClient, EnturJourneyPlannerClient,
    GeocoderConfig, GeocodingClient, GeocodingError, JourneyPlannerClient, TransitConfig,
    TransitError, TripPlanner, TripRequest,
};

const ADDRESS: &str = "Acme Hall, Karl Johans gate 1, 0154 Oslo, Norway";

fn geocoder_config(base_url: &str) -> GeocoderConfig {
    GeocoderConfig {
        base_url: format!("{base_url}/geocoder/v1/autocomplete"),
        timeout_secs: 5,
        ..GeocoderConfig::default()
    }
}

fn transit_config(base_url: &str) -> TransitConfig {
    TransitConfig {
        base_url: format!("{base_url}/journey-planner/v3/graphql"),
        ..TransitConfig::for_testing()
    }
}

fn planner_for(server: &MockServer) -> TripPlanner {
    let geocoder = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());
    let config = transit_config(&server.uri());
    let client = EnturJourneyPlannerClient::new(&config).unwrap();
    TripPlanner::new(resolver, Arc::new(client), &config)
}

fn feature_collection() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [10.738741, 59.913092] },
            "properties": { "label": "Karl Johans gate 1, Oslo" }
        }]
    })
}

fn trip_response() -> serde_json::Value {
    json!({
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
                                "duration": 300,
                                "fromPlace": { "name": "Origin" },
                                "toPlace": { "name": "Nationaltheatret" },
                                "line": null
                            },
                            {
                                "mode": "tram",
                                "duration": 1500,
                                "fromPlace": { "name": "Nationaltheatret" },
                                "toPlace": { "name": "Stortorvet" },
                                "line": { "publicCode": "11", "name": "Kjelsås - Majorstuen" }
                            },
                            {
                                "mode": "foot",
                                "duration": 730,
                                "fromPlace": { "name": "Stortorvet" },
                                "toPlace": { "name": "Destination" },
                                "line": null
                            }
                        ]
                    },
                    {
                        "duration": 2400,
                        "startTime": "2025-06-15T17:18:00+02:00",
                        "endTime": "2025-06-15T17:58:00+02:00",
                        "legs": [
                            {
                                "mode": "foot",
                                "duration": 2400,
                                "toPlace": { "name": "Destination" }
                            }
                        ]
                    }
                ]
            }
        }
    })
}

#[tokio::test]
async fn test_geocoder_sends_client_name_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder/v1/autocomplete"))
        .and(query_param("text", "Karl Johans gate 1 Oslo"))
        .and(query_param("size", "5"))
        .and(query_param("lang", "no"))
        .and(header("ET-Client-Name", "homeboy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(1)
        .mount(&server)
        .await;

    let client = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let candidates = client.search("Karl Johans gate 1 Oslo").await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].label, "Karl Johans gate 1, Oslo");
}

#[tokio::test]
async fn test_geocoder_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let result = client.search("Karl Johans gate 1 Oslo").await;
    assert!(matches!(result, Err(GeocodingError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_resolver_stops_after_first_hit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder/v1/autocomplete"))
        .and(query_param("text", "Karl Johans gate 1 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());

    let coordinate = resolver.resolve(ADDRESS).await.unwrap();
    assert!((coordinate.latitude() - 59.913_092).abs() < 1e-9);
    assert!((coordinate.longitude() - 10.738_741).abs() < 1e-9);
}

#[tokio::test]
async fn test_resolver_falls_back_after_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("text", "Karl Johans gate 1 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("text", "Karl Johans gate 1 0154 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("text", "Acme Hall Karl Johans gate 1 0154 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(0)
        .mount(&server)
        .await;

    let geocoder = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());
    assert!(resolver.resolve(ADDRESS).await.is_ok());
}

#[tokio::test]
async fn test_resolver_passes_over_features_without_usable_position() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("text", "Karl Johans gate 1 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [
                {
                    "geometry": { "coordinates": [200.0, 95.0] },
                    "properties": { "label": "first" }
                },
                {
                    "geometry": null,
                    "properties": { "label": "second" }
                },
                {
                    "geometry": { "coordinates": [10.5, 59.5] },
                    "properties": { "label": "third" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = EnturGeocodingClient::new(&geocoder_config(&server.uri())).unwrap();
    let resolver = AddressResolver::new(Arc::new(geocoder), AddressMatchingConfig::default());

    let coordinate = resolver.resolve(ADDRESS).await.unwrap();
    assert!((coordinate.latitude() - 59.5).abs() < 1e-9);
    assert!((coordinate.longitude() - 10.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_end_to_end_arrive_by_plan() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder/v1/autocomplete"))
        .and(query_param("text", "Karl Johans gate 1 Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/journey-planner/v3/graphql"))
        .and(header("ET-Client-Name", "homeboy"))
        .and(body_partial_json(json!({
            "variables": {
                "from": { "coordinates": { "latitude": 59.91, "longitude": 10.75 } },
                "dateTime": "2025-06-15T18:00:00+02:00",
                "arriveBy": true,
                "numTripPatterns": 3
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(trip_response()))
        .expect(1)
        .mount(&server)
        .await;

    let origin = Coordinate::new(59.91, 10.75).unwrap();
    let routes = planner_for(&server)
        .plan(origin, ADDRESS, "2025-06-15T16:00:00Z")
        .await;

    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|route| !route.legs().is_empty()));
    assert!(routes.len() <= 3);

    let first = &routes[0];
    assert_eq!(first.total_duration_minutes(), 43);
    assert_eq!(first.depart_by().to_rfc3339(), "2025-06-15T17:17:50+02:00");
    assert_eq!(first.arrival().to_rfc3339(), "2025-06-15T18:00:00+02:00");
    assert_eq!(first.legs()[0].instruction(), "Walk to Nationaltheatret");
    assert_eq!(first.legs()[1].instruction(), "11 Kjelsås - Majorstuen");
    assert_eq!(first.legs()[1].duration_minutes(), 25);
    assert_eq!(first.legs()[2].duration_minutes(), 13);

    assert_eq!(routes[1].total_duration_minutes(), 40);
}

#[tokio::test]
async fn test_unusable_address_never_reaches_planner() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trip_response()))
        .expect(0)
        .mount(&server)
        .await;

    let origin = Coordinate::new(59.91, 10.75).unwrap();
    let routes = planner_for(&server)
        .plan(origin, "X", "2025-06-15T16:00:00Z")
        .await;
    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_planner_server_error_yields_no_routes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let origin = Coordinate::new(59.91, 10.75).unwrap();
    let routes = planner_for(&server)
        .plan(origin, ADDRESS, "2025-06-15T16:00:00Z")
        .await;
    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_graphql_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Unknown location" }],
            "data": null
        })))
        .mount(&server)
        .await;

    let client = EnturJourneyPlannerClient::new(&transit_config(&server.uri())).unwrap();
    let request = TripRequest::arriving_by(
        Coordinate::new(59.91, 10.75).unwrap(),
        Coordinate::new(59.9131, 10.7387).unwrap(),
        "2025-06-15T18:00:00+02:00",
    );

    let result = client.plan_trip(&request, 3).await;
    assert!(matches!(result, Err(TransitError::QueryFailed(_))));
}

#[tokio::test]
async fn test_planner_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = EnturJourneyPlannerClient::new(&transit_config(&server.uri())).unwrap();
    let request = TripRequest::arriving_by(
        Coordinate::new(59.91, 10.75).unwrap(),
        Coordinate::new(59.9131, 10.7387).unwrap(),
        "2025-06-15T18:00:00+02:00",
    );

    match client.plan_trip(&request, 3).await {
        Err(TransitError::RateLimitExceeded { retry_after_secs }) => {
            assert_eq!(retry_after_secs, Some(30));
        },
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "query": "{ __typename }" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "__typename": "QueryType" }
        })))
        .mount(&server)
        .await;

    let client = EnturJourneyPlannerClient::new(&transit_config(&server.uri())).unwrap();
    assert!(client.is_healthy().await);
}

#[tokio::test]
async fn test_health_check_unreachable() {
    let client = EnturJourneyPlannerClient::new(&transit_config("http://127.0.0.1:1")).unwrap();
    assert!(!client.is_healthy().await);
}
