//! Core traits for the route planner.
//!
//! The engine talks to the outside world only through these seams. The
//! Google Maps adapter implements them over HTTP; tests implement them
//! in-process.

use crate::error::ServiceError;
use crate::model::{GeocodeResult, RouteRequest, RouteResponse};

/// Resolves free-text addresses to candidate locations.
pub trait Geocoder {
    /// Returns the candidates for `address`, best match first.
    ///
    /// An empty list means the provider found nothing for the address.
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ServiceError>;
}

/// Computes a single optimized route for a request.
pub trait RouteService {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError>;
}

/// A stop supplied by the ingestion side.
///
/// Only the address takes part in routing; everything else is carried
/// through untouched.
pub trait Stop {
    fn name(&self) -> &str;

    fn address(&self) -> &str;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ServiceError> {
        (**self).geocode(address)
    }
}

impl<R: RouteService + ?Sized> RouteService for &R {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError> {
        (**self).compute_route(request)
    }
}
