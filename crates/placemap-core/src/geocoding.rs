//! Address geocoding against a Google-compatible geocoding endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::GeocodingConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

/// Why an address could not be resolved. None of these abort an import;
/// the row is counted as failed and the run moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeFailure {
    #[error("geocoding API key not configured")]
    MissingApiKey,

    #[error("provider returned status {0}")]
    Status(String),

    #[error("provider returned no results")]
    NoResults,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unreadable provider response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(
        &self,
        street: &str,
        neighborhood: &str,
        municipality: &str,
    ) -> Result<GeocodeResult, GeocodeFailure>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    geometry: Geometry,
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub struct GoogleGeocoder {
    client: Client,
    config: GeocodingConfig,
}

impl GoogleGeocoder {
    pub fn new(config: GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create geocoding HTTP client")?;
        Ok(Self { client, config })
    }

    /// The free-text query sent to the provider.
    pub fn full_address(&self, street: &str, neighborhood: &str, municipality: &str) -> String {
        format!(
            "{street}, {neighborhood}, {municipality}, {}",
            self.config.region_suffix
        )
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(
        &self,
        street: &str,
        neighborhood: &str,
        municipality: &str,
    ) -> Result<GeocodeResult, GeocodeFailure> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            error!("Geocoding API key not configured");
            return Err(GeocodeFailure::MissingApiKey);
        };

        let address = self.full_address(street, neighborhood, municipality);
        debug!(%address, "Geocoding address");

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("address", address.as_str()), ("key", api_key)])
            .send()
            .await
            .map_err(|err| {
                error!(%address, error = %err, "Geocoding request failed");
                GeocodeFailure::Transport(err.to_string())
            })?;

        let body = response.json::<GeocodeResponse>().await.map_err(|err| {
            error!(%address, error = %err, "Geocoding response could not be decoded");
            GeocodeFailure::Decode(err.to_string())
        })?;

        if body.status != "OK" {
            warn!(
                %address,
                status = %body.status,
                message = body.error_message.as_deref().unwrap_or(""),
                "Geocoding failed"
            );
            return Err(GeocodeFailure::Status(body.status));
        }

        let Some(first) = body.results.into_iter().next() else {
            warn!(%address, "Geocoding returned OK without candidates");
            return Err(GeocodeFailure::NoResults);
        };

        Ok(GeocodeResult {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            formatted_address: first.formatted_address,
        })
    }
}
