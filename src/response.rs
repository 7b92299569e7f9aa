//! Turns a route-computation response into an annotated round trip.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::OptimizeError;
use crate::model::{GeocodeMap, Leg, RouteRequest, RouteResponse, RouteResult};

/// Builds a [`RouteResult`] from the first route of `response`.
///
/// `request` must be the request the response answers; its intermediate
/// positions map the service's waypoint indices back onto `destinations`.
/// Map links are left empty for the caller to fill in.
pub fn process_route<A: AsRef<str>>(
    response: RouteResponse,
    request: &RouteRequest,
    geocoded: &GeocodeMap,
    origin: &str,
    destinations: &[A],
) -> Result<RouteResult, OptimizeError> {
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(OptimizeError::NoRouteReturned)?;

    let order = visiting_order(
        &route.optimized_intermediate_waypoint_index,
        &request.intermediate_positions,
    );
    let (optimized_order, optimized_destinations): (Vec<usize>, Vec<String>) = order
        .into_iter()
        .filter_map(|position| {
            destinations
                .get(position)
                .map(|address| (position, address.as_ref().to_string()))
        })
        .unzip();

    let included: HashSet<usize> = request.intermediate_positions.iter().copied().collect();
    let unresolved_destinations = destinations
        .iter()
        .enumerate()
        .filter(|(position, _)| !included.contains(position))
        .map(|(_, address)| address.as_ref().to_string())
        .collect();

    let mut sequence: Vec<&str> = Vec::with_capacity(optimized_destinations.len() + 2);
    sequence.push(origin);
    sequence.extend(optimized_destinations.iter().map(String::as_str));
    sequence.push(origin);

    let expected_legs = sequence.len() - 1;
    if route.legs.len() < expected_legs {
        warn!(
            expected = expected_legs,
            returned = route.legs.len(),
            "route service returned fewer legs than stops, trailing legs omitted"
        );
    } else if route.legs.len() > expected_legs {
        warn!(
            expected = expected_legs,
            returned = route.legs.len(),
            "ignoring extra legs"
        );
    }

    let legs = route
        .legs
        .iter()
        .take(expected_legs)
        .enumerate()
        .map(|(position, leg)| {
            let start = sequence[position];
            let end = sequence[position + 1];
            Leg {
                position,
                start_address: start.to_string(),
                end_address: end.to_string(),
                start_geocode: geocoded.get(start).cloned(),
                end_geocode: geocoded.get(end).cloned(),
                distance_km: leg.distance_meters.unwrap_or(0) as f64 / 1000.0,
                duration_mins: duration_secs(leg.duration.as_deref()) / 60,
            }
        })
        .collect();

    if route.distance_meters.is_none() {
        debug!("route has no distanceMeters, reporting zero");
    }
    let total_distance_km = round_km(route.distance_meters.unwrap_or(0));
    let total_duration_mins = duration_secs(route.duration.as_deref()) / 60;

    info!(
        stops = optimized_destinations.len(),
        total_distance_km, total_duration_mins, "processed optimized route"
    );

    Ok(RouteResult {
        origin: origin.to_string(),
        input_destinations: destinations
            .iter()
            .map(|address| address.as_ref().to_string())
            .collect(),
        optimized_order,
        optimized_destinations,
        unresolved_destinations,
        total_distance_km,
        total_duration_mins,
        legs,
        encoded_polyline: route
            .polyline
            .map(|polyline| polyline.encoded_polyline)
            .unwrap_or_default(),
        map_url: String::new(),
        map_urls: Vec::new(),
    })
}

/// Maps the service's waypoint order onto destination positions.
///
/// Out-of-range or repeated indices are dropped; anything the service
/// failed to mention keeps its input order at the end. An empty order
/// means "as requested".
fn visiting_order(raw: &[i64], included: &[usize]) -> Vec<usize> {
    if raw.is_empty() {
        return included.to_vec();
    }

    let mut seen = vec![false; included.len()];
    let mut order = Vec::with_capacity(included.len());
    for &index in raw {
        match usize::try_from(index).ok().filter(|&slot| slot < included.len()) {
            Some(slot) if !seen[slot] => {
                seen[slot] = true;
                order.push(included[slot]);
            }
            Some(_) => warn!(index, "ignoring repeated waypoint index"),
            None => warn!(
                index,
                intermediates = included.len(),
                "ignoring out-of-range waypoint index"
            ),
        }
    }

    for (slot, &position) in included.iter().enumerate() {
        if !seen[slot] {
            warn!(index = slot, "waypoint missing from optimized order, appending");
            order.push(position);
        }
    }
    order
}

/// Parses a `"<seconds>s"` duration. Missing or malformed values count as zero.
fn duration_secs(value: Option<&str>) -> u64 {
    let Some(raw) = value else {
        return 0;
    };
    let secs = raw
        .strip_suffix('s')
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0);
    match secs {
        Some(secs) => secs as u64,
        None => {
            warn!(duration = raw, "unparsable duration, reporting zero");
            0
        }
    }
}

fn round_km(meters: u64) -> f64 {
    (meters as f64 / 10.0).round() / 100.0
}
