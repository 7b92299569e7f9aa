//! route-planner core
//!
//! Turns a list of stops into one optimized round trip from a fixed origin:
//! geocoding with a per-instance cache, a Google Routes request with
//! waypoint optimization, per-leg reconstruction and shareable map links.

pub mod error;
pub mod geocode;
pub mod google;
pub mod itinerary;
pub mod map_link;
pub mod model;
pub mod optimizer;
pub mod polyline;
pub mod request;
pub mod response;
pub mod traits;

pub use error::{ConfigError, MapLinkError, OptimizeError, PolylineError, ServiceError};
pub use google::{GoogleMapsClient, GoogleMapsConfig};
pub use itinerary::{Itinerary, ItineraryStop, StopRecord};
pub use model::{GeocodeMap, GeocodeResult, Leg, RouteRequest, RouteResponse, RouteResult};
pub use optimizer::{OptimizerOptions, RouteOptimizer};
pub use traits::{Geocoder, RouteService, Stop};
