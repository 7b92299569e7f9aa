//! End-to-end optimizer behaviour against in-process services.

mod fixtures;

use std::time::Duration;

use route_planner::{OptimizeError, OptimizerOptions, RouteOptimizer, Stop, StopRecord};

use fixtures::{CITIES, CUSTOMERS, HOME, Location, MockGeocoder, MockRoutes, addresses, all};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn fast_options() -> OptimizerOptions {
    OptimizerOptions {
        geocode_delay: Duration::ZERO,
        ..OptimizerOptions::default()
    }
}

fn optimizer<'a>(
    geocoder: &'a MockGeocoder,
    routes: &'a MockRoutes,
) -> RouteOptimizer<&'a MockGeocoder, &'a MockRoutes> {
    RouteOptimizer::with_options(geocoder, routes, fast_options())
}

fn simple_geocoder() -> MockGeocoder {
    MockGeocoder::new(&[
        Location::new("A", 47.60, -122.30),
        Location::new("B", 47.61, -122.20),
        Location::new("C", 47.67, -122.12),
    ])
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn reorders_destinations_by_service_order() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().with_order(vec![1, 0]);

    let result = optimizer(&geocoder, &routes).optimize("A", &["B", "C"]).unwrap();

    assert_eq!(result.optimized_destinations, vec!["C", "B"]);
    assert_eq!(result.legs[0].start_address, "A");
    assert_eq!(result.legs[0].end_address, "C");
    assert_eq!(result.legs.len(), 3);
    assert_eq!(result.legs[2].end_address, "A");
}

#[test]
fn empty_order_keeps_request_order() {
    let locations = all();
    let geocoder = MockGeocoder::new(&locations);
    let routes = MockRoutes::new();
    let destinations = addresses(CITIES);

    let result = optimizer(&geocoder, &routes)
        .optimize(HOME.address, &destinations)
        .unwrap();

    assert_eq!(result.optimized_destinations, destinations);
    assert_eq!(result.optimized_order, vec![0, 1, 2, 3]);
}

#[test]
fn single_destination_round_trip() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    let result = optimizer(&geocoder, &routes).optimize("A", &["B"]).unwrap();

    assert_eq!(result.optimized_destinations, vec!["B"]);
    assert_eq!(result.legs.len(), 2);
    assert_eq!(result.return_leg().unwrap().start_address, "B");
}

// ============================================================================
// Unresolvable addresses
// ============================================================================

#[test]
fn unresolvable_destination_is_dropped() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().reversing();

    let result = optimizer(&geocoder, &routes)
        .optimize("A", &["B", "X", "C"])
        .unwrap();

    let request = &routes.requests()[0];
    assert_eq!(request.intermediates.len(), 2);
    assert_eq!(result.optimized_destinations, vec!["C", "B"]);
    assert_eq!(result.optimized_order, vec![2, 0]);
    assert_eq!(result.unresolved_destinations, vec!["X"]);
    assert!(!result.legs.iter().any(|leg| leg.end_address == "X"));
}

#[test]
fn failing_geocode_only_skips_that_address() {
    let geocoder = simple_geocoder().failing_on("B");
    let routes = MockRoutes::new();

    let result = optimizer(&geocoder, &routes).optimize("A", &["B", "C"]).unwrap();

    assert_eq!(result.optimized_destinations, vec!["C"]);
    assert_eq!(result.unresolved_destinations, vec!["B"]);
}

#[test]
fn unresolvable_origin_fails_before_routing() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    let err = optimizer(&geocoder, &routes)
        .optimize("Nowhere", &["B", "C"])
        .unwrap_err();

    assert!(matches!(err, OptimizeError::OriginUnresolved { ref origin } if origin == "Nowhere"));
    assert!(routes.requests().is_empty());
}

// ============================================================================
// Route service failures
// ============================================================================

#[test]
fn empty_route_list_is_fatal() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().without_routes();

    let err = optimizer(&geocoder, &routes).optimize("A", &["B"]).unwrap_err();

    assert!(matches!(err, OptimizeError::NoRouteReturned));
}

#[test]
fn service_error_is_propagated() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().failing_with(429);

    let err = optimizer(&geocoder, &routes).optimize("A", &["B"]).unwrap_err();

    assert!(matches!(err, OptimizeError::RouteService(_)));
    assert!(err.to_string().contains("429"));
}

// ============================================================================
// Totals and legs
// ============================================================================

#[test]
fn totals_use_route_summary_not_leg_sum() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    let result = optimizer(&geocoder, &routes).optimize("A", &["B", "C"]).unwrap();

    assert_eq!(result.total_distance_km, 84.22);
    assert_eq!(result.total_duration_mins, 90);
    let leg_sum: f64 = result.legs.iter().map(|leg| leg.distance_km).sum();
    assert_eq!(leg_sum, 6.0);
}

#[test]
fn short_leg_list_omits_trailing_legs() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().with_legs(1);

    let result = optimizer(&geocoder, &routes).optimize("A", &["B", "C"]).unwrap();

    assert_eq!(result.legs.len(), 1);
    assert!(result.return_leg().is_none());
}

#[test]
fn legs_carry_geocodes() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    let result = optimizer(&geocoder, &routes).optimize("A", &["B"]).unwrap();

    let first = &result.legs[0];
    assert_eq!(first.start_geocode.as_ref().unwrap().latitude, 47.60);
    assert_eq!(first.end_geocode.as_ref().unwrap().place_id, "place:B");
    assert_eq!(first.duration_mins, 1);
}

// ============================================================================
// Caching
// ============================================================================

#[test]
fn repeated_optimizations_reuse_geocodes() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();
    let mut optimizer = optimizer(&geocoder, &routes);

    optimizer.optimize("A", &["B", "C"]).unwrap();
    optimizer.optimize("A", &["C", "B"]).unwrap();

    assert_eq!(geocoder.calls(), vec!["A", "B", "C"]);
    assert_eq!(optimizer.cache_stats().lookups, 3);
    assert_eq!(optimizer.cache_stats().hits, 3);
    assert!(optimizer.resolver().cached("B").is_some());
}

#[test]
fn origin_listed_as_destination_is_geocoded_once() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    optimizer(&geocoder, &routes).optimize("A", &["A", "B"]).unwrap();

    assert_eq!(geocoder.calls(), vec!["A", "B"]);
}

// ============================================================================
// Map links
// ============================================================================

#[test]
fn short_tour_gets_one_link() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().with_order(vec![1, 0]);

    let result = optimizer(&geocoder, &routes).optimize("A", &["B", "C"]).unwrap();

    assert_eq!(
        result.map_url,
        "https://www.google.com/maps/dir/47.6,-122.3/47.67,-122.12/47.61,-122.2/47.6,-122.3"
    );
    assert_eq!(result.map_urls, vec![result.map_url.clone()]);
}

#[test]
fn twelve_destinations_are_split_into_links() {
    let locations = all();
    let geocoder = MockGeocoder::new(&locations);
    let routes = MockRoutes::new().reversing();
    let destinations = addresses(CUSTOMERS);
    assert_eq!(destinations.len(), 12);

    let result = optimizer(&geocoder, &routes)
        .optimize(HOME.address, &destinations)
        .unwrap();

    assert_eq!(result.map_urls.len(), 2);
    assert_eq!(result.map_url, result.map_urls[0]);
    let home = format!("{},{}", HOME.lat, HOME.lng);
    assert!(result.map_urls[0].contains(&format!("/dir/{}/", home)));
    assert!(result.map_urls[1].ends_with(&format!("/{}", home)));
    for url in &result.map_urls {
        let stops = url.trim_start_matches("https://www.google.com/maps/dir/").split('/').count();
        assert!(stops <= 10, "{} has {} stops", url, stops);
    }
}

// ============================================================================
// Stop records
// ============================================================================

#[test]
fn stops_are_paired_by_position() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new().with_order(vec![2, 0, 1]);
    let stops = vec![
        StopRecord::new("Front desk", "B"),
        StopRecord::new("Warehouse", "C"),
        StopRecord::new("Loading dock", "B"),
    ];

    let itinerary = optimizer(&geocoder, &routes).optimize_stops("A", &stops).unwrap();

    let names: Vec<&str> = itinerary.stops().iter().map(|s| s.stop.name()).collect();
    assert_eq!(names, vec!["Loading dock", "Front desk", "Warehouse"]);
    let distances: Vec<f64> = itinerary
        .stops()
        .iter()
        .map(|s| s.leg.as_ref().unwrap().distance_km)
        .collect();
    assert_eq!(distances, vec![1.0, 2.0, 3.0]);
    assert_eq!(itinerary.return_leg().unwrap().distance_km, 4.0);
}

#[test]
fn result_serializes_to_json() {
    let geocoder = simple_geocoder();
    let routes = MockRoutes::new();

    let result = optimizer(&geocoder, &routes).optimize("A", &["B"]).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["origin"], "A");
    assert_eq!(json["optimized_destinations"][0], "B");
    assert_eq!(json["legs"][0]["distance_km"], 1.0);
    assert_eq!(result.path().unwrap().points().len(), 3);
}
