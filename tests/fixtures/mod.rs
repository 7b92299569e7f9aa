//! Test fixtures for route-planner.
//!
//! Provides real Seattle Eastside addresses with their coordinates and
//! in-process doubles for the geocoding and routing services.

#![allow(dead_code)]

pub mod eastside_locations;
pub mod services;

pub use eastside_locations::*;
pub use services::*;
