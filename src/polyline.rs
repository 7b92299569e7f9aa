//! Polyline representation for route geometries.
//!
//! Routes carry their path as an encoded polyline string, which the engine
//! passes through untouched. This module decodes it into coordinates when a
//! caller wants the actual path.

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;

/// Coordinates are stored with five decimal digits of precision.
const PRECISION: f64 = 1e5;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut offset = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while offset < bytes.len() {
            let start = offset;
            lat = lat
                .checked_add(next_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset: start })?;
            let start = offset;
            lng = lng
                .checked_add(next_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset: start })?;
            points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Reads one zig-zag encoded delta starting at `offset`.
fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated { offset: *offset });
        };
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidByte {
                offset: *offset,
                byte,
            });
        }
        *offset += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
