//! Round-trip route optimization: geocode, request, process, link.

use std::time::Duration;

use tracing::{error, info};

use crate::error::OptimizeError;
use crate::geocode::{CacheStats, DEFAULT_GEOCODE_DELAY, GeocodeResolver};
use crate::itinerary::Itinerary;
use crate::map_link::{MapLinkOptions, generate_map_links};
use crate::model::RouteResult;
use crate::request::{RequestOptions, build_route_request};
use crate::response::process_route;
use crate::traits::{Geocoder, RouteService, Stop};

#[derive(Debug, Clone)]
pub struct OptimizerOptions {
    /// Pause between geocoding requests. Cache hits are never delayed.
    pub geocode_delay: Duration,
    pub request: RequestOptions,
    pub map_links: MapLinkOptions,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            geocode_delay: DEFAULT_GEOCODE_DELAY,
            request: RequestOptions::default(),
            map_links: MapLinkOptions::default(),
        }
    }
}

/// Plans round trips from a fixed origin.
///
/// Each optimizer owns its geocode cache, so addresses seen by earlier
/// calls on the same instance are not geocoded again. Use one instance
/// per session.
pub struct RouteOptimizer<G, R> {
    resolver: GeocodeResolver<G>,
    routes: R,
    options: OptimizerOptions,
}

impl<G: Geocoder, R: RouteService> RouteOptimizer<G, R> {
    pub fn new(geocoder: G, routes: R) -> Self {
        Self::with_options(geocoder, routes, OptimizerOptions::default())
    }

    pub fn with_options(geocoder: G, routes: R, options: OptimizerOptions) -> Self {
        Self {
            resolver: GeocodeResolver::with_delay(geocoder, options.geocode_delay),
            routes,
            options,
        }
    }

    /// Computes the optimized round trip `origin → destinations → origin`.
    ///
    /// Unresolvable destinations are left out and listed in
    /// [`RouteResult::unresolved_destinations`]. An unresolvable origin, a
    /// route service failure or an empty route list fails the whole call.
    pub fn optimize<A: AsRef<str>>(
        &mut self,
        origin: &str,
        destinations: &[A],
    ) -> Result<RouteResult, OptimizeError> {
        info!(
            origin,
            destinations = destinations.len(),
            "starting route optimization"
        );

        let mut addresses: Vec<&str> = Vec::with_capacity(destinations.len() + 1);
        addresses.push(origin);
        addresses.extend(destinations.iter().map(|address| address.as_ref()));
        let geocoded = self.resolver.resolve(&addresses);

        let request = build_route_request(origin, destinations, &geocoded, &self.options.request)
            .inspect_err(|err| error!(error = %err, "route optimization failed"))?;

        let response = self
            .routes
            .compute_route(&request)
            .inspect_err(|err| error!(error = %err, "route optimization failed"))?;

        let mut result = process_route(response, &request, &geocoded, origin, destinations)
            .inspect_err(|err| error!(error = %err, "route optimization failed"))?;

        result.map_urls = generate_map_links(
            &geocoded,
            origin,
            &result.optimized_destinations,
            &self.options.map_links,
        );
        result.map_url = result.map_urls.first().cloned().unwrap_or_default();

        Ok(result)
    }

    /// Like [`optimize`](Self::optimize), taking stop records and pairing
    /// the result back with them by position.
    pub fn optimize_stops<'a, S: Stop>(
        &mut self,
        origin: &str,
        stops: &'a [S],
    ) -> Result<Itinerary<'a, S>, OptimizeError> {
        let addresses: Vec<&str> = stops.iter().map(Stop::address).collect();
        let result = self.optimize(origin, &addresses)?;
        Ok(Itinerary::new(result, stops))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.stats()
    }

    pub fn resolver(&self) -> &GeocodeResolver<G> {
        &self.resolver
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }
}
