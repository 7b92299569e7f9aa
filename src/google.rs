//! Google Maps HTTP adapter for geocoding and route computation.

use std::env;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ServiceError};
use crate::model::{GeocodeResult, RouteRequest, RouteResponse};
use crate::traits::{Geocoder, RouteService};

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Fields requested from `computeRoutes`; anything else is left out of
/// the response.
pub const ROUTES_FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline,routes.legs,routes.optimizedIntermediateWaypointIndex";

#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub geocode_url: String,
    pub routes_url: String,
    pub timeout_secs: u64,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            routes_url: "https://routes.googleapis.com/directions/v2:computeRoutes".to_string(),
            timeout_secs: 30,
            system_proxy: true,
        }
    }
}

impl GoogleMapsConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// `GOOGLE_MAPS_API_KEY` is required. `GOOGLE_MAPS_GEOCODE_URL`,
    /// `GOOGLE_MAPS_ROUTES_URL` and `GOOGLE_MAPS_TIMEOUT_SECS` override
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey { var: API_KEY_VAR })?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(url) = lookup("GOOGLE_MAPS_GEOCODE_URL") {
            config.geocode_url = url;
        }
        if let Some(url) = lookup("GOOGLE_MAPS_ROUTES_URL") {
            config.routes_url = url;
        }
        if let Some(value) = lookup("GOOGLE_MAPS_TIMEOUT_SECS") {
            config.timeout_secs = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "GOOGLE_MAPS_TIMEOUT_SECS",
                value,
            })?;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GoogleMapsConfig {
        &self.config
    }
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ServiceError> {
        let response = self
            .client
            .get(&self.config.geocode_url)
            .query(&[("address", address), ("key", self.config.api_key.as_str())])
            .send()?;
        let body: GeocodeResponse = success(response)?.json()?;

        match body.status.as_str() {
            "OK" => Ok(body
                .results
                .into_iter()
                .map(|candidate| GeocodeResult {
                    latitude: candidate.geometry.location.lat,
                    longitude: candidate.geometry.location.lng,
                    place_id: candidate.place_id,
                    formatted_address: candidate.formatted_address,
                })
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(ServiceError::Api {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }
}

impl RouteService for GoogleMapsClient {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError> {
        debug!(
            intermediates = request.intermediates.len(),
            "calling routes API"
        );
        let response = self
            .client
            .post(&self.config.routes_url)
            .header("X-Goog-Api-Key", self.config.api_key.as_str())
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(request)
            .send()?;

        Ok(success(response)?.json()?)
    }
}

/// Turns a non-2xx response into [`ServiceError::Status`] carrying its body.
fn success(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    geometry: Geometry,
    place_id: String,
    #[serde(default)]
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLngLiteral,
}

#[derive(Debug, Deserialize)]
struct LatLngLiteral {
    lat: f64,
    lng: f64,
}
