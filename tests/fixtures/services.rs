//! In-process doubles for the geocoding and route services.

use std::cell::RefCell;
use std::collections::HashMap;

use route_planner::model::{Route, RouteLeg, RoutePolyline};
use route_planner::{Geocoder, GeocodeResult, RouteRequest, RouteResponse, RouteService, ServiceError};

use super::eastside_locations::Location;

/// Geocoder backed by a fixed table. Unknown addresses have no results.
#[derive(Default)]
pub struct MockGeocoder {
    table: HashMap<String, (f64, f64)>,
    failing: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl MockGeocoder {
    pub fn new(locations: &[Location]) -> Self {
        Self {
            table: locations
                .iter()
                .map(|l| (l.address.to_string(), (l.lat, l.lng)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.push(address.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Geocoder for MockGeocoder {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ServiceError> {
        self.calls.borrow_mut().push(address.to_string());
        if self.failing.iter().any(|a| a == address) {
            return Err(ServiceError::Api {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: "slow down".to_string(),
            });
        }
        Ok(self
            .table
            .get(address)
            .map(|(lat, lng)| GeocodeResult {
                latitude: *lat,
                longitude: *lng,
                place_id: format!("place:{}", address),
                formatted_address: format!("{}, USA", address),
            })
            .into_iter()
            .collect())
    }
}

/// Route service that answers with a scripted order and one leg per hop.
///
/// Leg `i` is `(i + 1)` km long and takes `(i + 1)` minutes.
#[derive(Default)]
pub struct MockRoutes {
    order: Option<Vec<i64>>,
    reverse: bool,
    legs: Option<usize>,
    no_routes: bool,
    status_error: Option<u16>,
    requests: RefCell<Vec<RouteRequest>>,
}

impl MockRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with exactly this `optimizedIntermediateWaypointIndex`.
    pub fn with_order(mut self, order: Vec<i64>) -> Self {
        self.order = Some(order);
        self
    }

    /// Visit the intermediates in reverse request order.
    pub fn reversing(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_legs(mut self, legs: usize) -> Self {
        self.legs = Some(legs);
        self
    }

    pub fn without_routes(mut self) -> Self {
        self.no_routes = true;
        self
    }

    pub fn failing_with(mut self, status: u16) -> Self {
        self.status_error = Some(status);
        self
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.borrow().clone()
    }
}

impl RouteService for MockRoutes {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError> {
        self.requests.borrow_mut().push(request.clone());

        if let Some(status) = self.status_error {
            return Err(ServiceError::Status {
                status,
                body: "quota exceeded".to_string(),
            });
        }
        if self.no_routes {
            return Ok(RouteResponse::default());
        }

        let count = request.intermediates.len();
        let order = match &self.order {
            Some(order) => order.clone(),
            None if self.reverse => (0..count as i64).rev().collect(),
            None => Vec::new(),
        };
        let legs = (0..self.legs.unwrap_or(count + 1))
            .map(|i| RouteLeg {
                distance_meters: Some((i as u64 + 1) * 1000),
                duration: Some(format!("{}s", (i + 1) * 60)),
            })
            .collect();

        Ok(RouteResponse {
            routes: vec![Route {
                duration: Some("5430s".to_string()),
                distance_meters: Some(84_216),
                polyline: Some(RoutePolyline {
                    encoded_polyline: "_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(),
                }),
                legs,
                optimized_intermediate_waypoint_index: order,
            }],
        })
    }
}
