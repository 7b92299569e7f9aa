//! Builds the route-computation request for a closed tour.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OptimizeError;
use crate::model::{
    GeocodeMap, RouteModifiers, RouteRequest, RoutingPreference, TravelMode, Units, Waypoint,
};

/// Tunables passed through to the route service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub route_modifiers: RouteModifiers,
    pub language_code: String,
    pub units: Units,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            route_modifiers: RouteModifiers::default(),
            language_code: "en-US".to_string(),
            units: Units::Metric,
        }
    }
}

/// Builds a round-trip request starting and ending at `origin`.
///
/// Destinations missing from `geocoded` are left out. The origin must be
/// resolved, there is nothing to route from otherwise.
pub fn build_route_request<A: AsRef<str>>(
    origin: &str,
    destinations: &[A],
    geocoded: &GeocodeMap,
    options: &RequestOptions,
) -> Result<RouteRequest, OptimizeError> {
    let origin_geocode = geocoded
        .get(origin)
        .ok_or_else(|| OptimizeError::OriginUnresolved {
            origin: origin.to_string(),
        })?;
    let origin_waypoint = Waypoint::from(origin_geocode.lat_lng());

    let mut intermediates = Vec::with_capacity(destinations.len());
    let mut intermediate_positions = Vec::with_capacity(destinations.len());
    for (position, address) in destinations.iter().enumerate() {
        let address = address.as_ref();
        match geocoded.get(address) {
            Some(result) => {
                intermediates.push(Waypoint::from(result.lat_lng()));
                intermediate_positions.push(position);
            }
            None => debug!(address, position, "dropping unresolved destination"),
        }
    }

    info!(
        intermediates = intermediates.len(),
        dropped = destinations.len() - intermediates.len(),
        "built route request"
    );

    Ok(RouteRequest {
        origin: origin_waypoint,
        destination: origin_waypoint,
        intermediates,
        travel_mode: TravelMode::Drive,
        routing_preference: RoutingPreference::TrafficAware,
        optimize_waypoint_order: true,
        compute_alternative_routes: false,
        route_modifiers: options.route_modifiers,
        language_code: options.language_code.clone(),
        units: options.units,
        intermediate_positions,
    })
}
