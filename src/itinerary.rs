//! Pairs an optimized route with the caller's stop records.
//!
//! Stops and legs are matched by sequence position, never by address, so
//! two stops sharing an address each keep their own leg.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Leg, RouteResult};
use crate::traits::Stop;

/// A stop as it arrives from the ingestion side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Any further columns, carried through untouched.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl StopRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: None,
            metadata: BTreeMap::new(),
        }
    }
}

impl Stop for StopRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Clone)]
pub struct ItineraryStop<'a, S> {
    /// 0-based visiting position.
    pub sequence: usize,
    pub stop: &'a S,
    /// Leg arriving at this stop, if the route service returned it.
    pub leg: Option<Leg>,
}

#[derive(Debug, Clone)]
pub struct Itinerary<'a, S> {
    result: RouteResult,
    stops: Vec<ItineraryStop<'a, S>>,
}

impl<'a, S> Itinerary<'a, S> {
    /// `stops` must be the records whose addresses produced `result`, in
    /// the same order.
    pub fn new(result: RouteResult, stops: &'a [S]) -> Self {
        let stops = result
            .optimized_order
            .iter()
            .enumerate()
            .filter_map(|(sequence, &position)| {
                stops.get(position).map(|stop| ItineraryStop {
                    sequence,
                    stop,
                    leg: result.leg_to_stop(sequence).cloned(),
                })
            })
            .collect();

        Self { result, stops }
    }

    /// Stops in visiting order. Unresolvable stops are not included.
    pub fn stops(&self) -> &[ItineraryStop<'a, S>] {
        &self.stops
    }

    pub fn return_leg(&self) -> Option<&Leg> {
        self.result.return_leg()
    }

    pub fn result(&self) -> &RouteResult {
        &self.result
    }

    pub fn into_result(self) -> RouteResult {
        self.result
    }
}
