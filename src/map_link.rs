//! Shareable Google Maps direction links for an optimized tour.
//!
//! The map viewer only honours about ten stops per link. Tours with more
//! destinations than `max_single_link_destinations` are split into
//! chained links: each link starts where the previous one ended, and the
//! last one returns to the origin.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::MapLinkError;
use crate::model::GeocodeMap;

pub const GOOGLE_MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLinkOptions {
    pub base_url: String,
    /// Largest tour rendered as a single link.
    pub max_single_link_destinations: usize,
    /// Destinations per link once a tour is split.
    pub batch_size: usize,
}

impl Default for MapLinkOptions {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_MAPS_DIR_URL.to_string(),
            max_single_link_destinations: 9,
            batch_size: 8,
        }
    }
}

/// Renders the tour origin → destinations → origin as one or more links.
pub fn map_links<A: AsRef<str>>(
    geocoded: &GeocodeMap,
    origin: &str,
    destinations: &[A],
    options: &MapLinkOptions,
) -> Result<Vec<String>, MapLinkError> {
    let origin_stop = stop_segment(origin, geocoded)?;
    let stops = destinations
        .iter()
        .map(|address| stop_segment(address.as_ref(), geocoded))
        .collect::<Result<Vec<_>, _>>()?;

    if stops.len() <= options.max_single_link_destinations {
        let mut segments = Vec::with_capacity(stops.len() + 2);
        segments.push(origin_stop.clone());
        segments.extend(stops);
        segments.push(origin_stop);
        return Ok(vec![render(&options.base_url, &segments)?]);
    }

    let batches: Vec<&[String]> = stops.chunks(options.batch_size.max(1)).collect();
    let mut links = Vec::with_capacity(batches.len());
    let mut start = origin_stop.clone();
    for (index, batch) in batches.iter().enumerate() {
        let mut segments = Vec::with_capacity(batch.len() + 2);
        segments.push(start);
        segments.extend(batch.iter().cloned());
        if index + 1 == batches.len() {
            segments.push(origin_stop.clone());
        }
        links.push(render(&options.base_url, &segments)?);
        start = batch.last().cloned().unwrap_or_else(|| origin_stop.clone());
    }
    Ok(links)
}

/// Like [`map_links`], but logs failures and returns no links instead.
pub fn generate_map_links<A: AsRef<str>>(
    geocoded: &GeocodeMap,
    origin: &str,
    destinations: &[A],
    options: &MapLinkOptions,
) -> Vec<String> {
    match map_links(geocoded, origin, destinations, options) {
        Ok(links) => {
            info!(
                destinations = destinations.len(),
                links = links.len(),
                "generated map links"
            );
            links
        }
        Err(err) => {
            error!(error = %err, "failed to generate map link");
            Vec::new()
        }
    }
}

/// `"lat,lng"` for geocoded stops, the `+`-joined address otherwise.
fn stop_segment(address: &str, geocoded: &GeocodeMap) -> Result<String, MapLinkError> {
    match geocoded.get(address) {
        Some(result) if result.latitude.is_finite() && result.longitude.is_finite() => {
            Ok(format!("{},{}", result.latitude, result.longitude))
        }
        Some(_) => Err(MapLinkError::NonFiniteCoordinate {
            address: address.to_string(),
        }),
        None => Ok(address.replace(' ', "+")),
    }
}

fn render(base_url: &str, segments: &[String]) -> Result<String, MapLinkError> {
    let mut url = format!("{}/{}", base_url.trim_end_matches('/'), segments.join("/"));

    // Camera view segments ("/@lat,lng,zoom") override the stop list.
    if let Some(camera) = url.find("/@") {
        url.truncate(camera);
    }
    let url = url.trim_end_matches('/').to_string();

    match reqwest::Url::parse(&url) {
        Ok(_) => Ok(url),
        Err(err) => Err(MapLinkError::InvalidUrl {
            url,
            reason: err.to_string(),
        }),
    }
}
