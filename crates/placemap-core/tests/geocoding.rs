mod common;

use std::collections::HashMap;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use common::{closed_addr, spawn_server};
use placemap_core::config::GeocodingConfig;
use placemap_core::geocoding::{GeocodeFailure, Geocoder, GoogleGeocoder};
use serde_json::{json, Value};

/// Mimics the provider: echoes the received address back as the formatted
/// address, answers ZERO_RESULTS for "Calle Inexistente" and an OK status
/// without candidates for "Vacía".
async fn fake_provider(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let address = params.get("address").cloned().unwrap_or_default();
    if params.get("key").map(String::as_str) != Some("test-key") {
        return Json(json!({ "status": "REQUEST_DENIED", "results": [], "error_message": "bad key" }));
    }
    if address.starts_with("Calle Inexistente") {
        return Json(json!({ "status": "ZERO_RESULTS", "results": [] }));
    }
    if address.starts_with("Vacía") {
        return Json(json!({ "status": "OK", "results": [] }));
    }
    Json(json!({
        "status": "OK",
        "results": [
            {
                "geometry": { "location": { "lat": 19.4270, "lng": -99.1677 } },
                "formatted_address": address
            },
            {
                "geometry": { "location": { "lat": 0.0, "lng": 0.0 } },
                "formatted_address": "second candidate"
            }
        ]
    }))
}

async fn geocoder_with_key(api_key: Option<&str>) -> GoogleGeocoder {
    let addr = spawn_server(Router::new().route("/geocode/json", get(fake_provider))).await;
    GoogleGeocoder::new(GeocodingConfig {
        api_key: api_key.map(str::to_string),
        endpoint: format!("http://{addr}/geocode/json"),
        ..GeocodingConfig::default()
    })
    .expect("client")
}

#[tokio::test]
async fn first_candidate_is_returned() {
    let geocoder = geocoder_with_key(Some("test-key")).await;

    let result = geocoder
        .geocode("Av. Reforma, 100", "Juárez", "Cuauhtémoc")
        .await
        .expect("geocoded");

    assert_eq!(result.latitude, 19.4270);
    assert_eq!(result.longitude, -99.1677);
    // The echo proves the query survived URL encoding intact.
    assert_eq!(
        result.formatted_address,
        "Av. Reforma, 100, Juárez, Cuauhtémoc, Ciudad de México, México"
    );
}

#[tokio::test]
async fn zero_results_is_a_failure_not_an_error() {
    let geocoder = geocoder_with_key(Some("test-key")).await;

    let failure = geocoder
        .geocode("Calle Inexistente 999", "Nowhere", "Cuauhtémoc")
        .await
        .expect_err("no match");

    assert_eq!(failure, GeocodeFailure::Status("ZERO_RESULTS".to_string()));
}

#[tokio::test]
async fn ok_without_candidates_is_no_results() {
    let geocoder = geocoder_with_key(Some("test-key")).await;

    let failure = geocoder
        .geocode("Vacía 1", "Centro", "Cuauhtémoc")
        .await
        .expect_err("no candidates");

    assert_eq!(failure, GeocodeFailure::NoResults);
}

#[tokio::test]
async fn rejected_key_reports_provider_status() {
    let geocoder = geocoder_with_key(Some("wrong-key")).await;

    let failure = geocoder
        .geocode("Durango 200", "Roma Norte", "Cuauhtémoc")
        .await
        .expect_err("denied");

    assert_eq!(failure, GeocodeFailure::Status("REQUEST_DENIED".to_string()));
}

#[tokio::test]
async fn missing_key_skips_the_request() {
    let addr = closed_addr().await;
    let geocoder = GoogleGeocoder::new(GeocodingConfig {
        api_key: None,
        endpoint: format!("http://{addr}/geocode/json"),
        ..GeocodingConfig::default()
    })
    .expect("client");

    let failure = geocoder
        .geocode("Durango 200", "Roma Norte", "Cuauhtémoc")
        .await
        .expect_err("no key");

    assert_eq!(failure, GeocodeFailure::MissingApiKey);
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_failure() {
    let addr = closed_addr().await;
    let geocoder = GoogleGeocoder::new(GeocodingConfig {
        api_key: Some("test-key".into()),
        endpoint: format!("http://{addr}/geocode/json"),
        ..GeocodingConfig::default()
    })
    .expect("client");

    let failure = geocoder
        .geocode("Durango 200", "Roma Norte", "Cuauhtémoc")
        .await
        .expect_err("unreachable");

    assert!(matches!(failure, GeocodeFailure::Transport(_)));
}

#[test]
fn full_address_appends_region_suffix() {
    let geocoder = GoogleGeocoder::new(GeocodingConfig {
        region_suffix: "Guadalajara, Jalisco, México".into(),
        ..GeocodingConfig::default()
    })
    .expect("client");

    assert_eq!(
        geocoder.full_address("Chapultepec 15", "Americana", "Guadalajara"),
        "Chapultepec 15, Americana, Guadalajara, Guadalajara, Jalisco, México"
    );
}
