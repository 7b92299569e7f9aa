//! Data exchanged between the engine, the external services and callers.
//!
//! Request and response types mirror the Google Routes API wire format
//! (camelCase JSON). Result types serialize in snake_case for logging and
//! persistence.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;
use crate::polyline::Polyline;

/// Resolved location for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub place_id: String,
    pub formatted_address: String,
}

impl GeocodeResult {
    pub fn lat_lng(&self) -> LatLng {
        LatLng {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Address string → resolution. A missing key means "unresolvable".
pub type GeocodeMap = HashMap<String, GeocodeResult>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat_lng: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: Location,
}

impl From<LatLng> for Waypoint {
    fn from(lat_lng: LatLng) -> Self {
        Self {
            location: Location { lat_lng },
        }
    }
}

impl Waypoint {
    pub fn lat_lng(&self) -> LatLng {
        self.location.lat_lng
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Drive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingPreference {
    TrafficAware,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl FromStr for Units {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "METRIC" => Ok(Units::Metric),
            "IMPERIAL" => Ok(Units::Imperial),
            other => Err(format!("unknown unit system '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteModifiers {
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub avoid_ferries: bool,
}

/// A `computeRoutes` request for one closed tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    /// Resolved destinations in input order.
    pub intermediates: Vec<Waypoint>,
    pub travel_mode: TravelMode,
    pub routing_preference: RoutingPreference,
    pub optimize_waypoint_order: bool,
    pub compute_alternative_routes: bool,
    pub route_modifiers: RouteModifiers,
    pub language_code: String,
    pub units: Units,
    /// For each intermediate, its position in the caller's destination list.
    #[serde(skip)]
    pub intermediate_positions: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Seconds with a unit suffix, e.g. `"1834s"`.
    pub duration: Option<String>,
    pub distance_meters: Option<u64>,
    pub polyline: Option<RoutePolyline>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    /// Indices into the request's intermediates, in visiting order.
    #[serde(default)]
    pub optimized_intermediate_waypoint_index: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePolyline {
    #[serde(default)]
    pub encoded_polyline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub distance_meters: Option<u64>,
    pub duration: Option<String>,
}

/// Travel between two consecutive stops of the optimized tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Index of this leg in the visiting sequence. Leg `i` ends at
    /// `optimized_destinations[i]`, the last leg ends at the origin.
    pub position: usize,
    pub start_address: String,
    pub end_address: String,
    pub start_geocode: Option<GeocodeResult>,
    pub end_geocode: Option<GeocodeResult>,
    pub distance_km: f64,
    pub duration_mins: u64,
}

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub origin: String,
    pub input_destinations: Vec<String>,
    /// Positions in `input_destinations`, in visiting order.
    pub optimized_order: Vec<usize>,
    pub optimized_destinations: Vec<String>,
    /// Destinations that could not be geocoded and were left out.
    pub unresolved_destinations: Vec<String>,
    pub total_distance_km: f64,
    pub total_duration_mins: u64,
    pub legs: Vec<Leg>,
    pub encoded_polyline: String,
    /// First (or only) map link; empty when link generation failed.
    pub map_url: String,
    /// Every map link of the tour, chained in order.
    pub map_urls: Vec<String>,
}

impl RouteResult {
    /// Leg arriving at the stop visited at `sequence` (0-based).
    pub fn leg_to_stop(&self, sequence: usize) -> Option<&Leg> {
        self.legs.iter().find(|leg| leg.position == sequence)
    }

    /// Leg from the last stop back to the origin, if it was returned.
    pub fn return_leg(&self) -> Option<&Leg> {
        self.leg_to_stop(self.optimized_destinations.len())
    }

    /// Decodes the route geometry.
    pub fn path(&self) -> Result<Polyline, PolylineError> {
        Polyline::decode(&self.encoded_polyline)
    }
}
