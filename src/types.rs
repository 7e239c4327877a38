//! Data types flowing through the join and aggregation pipeline.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A single geotagged accessibility barrier.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    /// Nominally 1–5. `None` when the source row left it blank.
    pub severity: Option<u8>,
    pub label_type: String,
    pub is_temporary: bool,
    pub neighborhood: Option<String>,
}

impl Barrier {
    /// Whether this barrier may contribute to a stop's profile at all.
    pub fn is_countable(&self) -> bool {
        !self.is_temporary && self.severity.is_some()
    }
}

/// A transit stop and the routes serving it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub routes: BTreeSet<String>,
}

/// Per-stop accessibility profile, written to `stops.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub routes: Vec<String>,
    pub neighborhood: Option<String>,
    pub barrier_types: Vec<String>,
    /// Sparse histogram; serde_json writes the integer keys as strings.
    pub severity: BTreeMap<u8, usize>,
    pub total_barriers: usize,
}

impl StopRecord {
    /// Number of barriers at or above `min_severity`.
    pub fn severe_count(&self, min_severity: u8) -> usize {
        self.severity.range(min_severity..).map(|(_, n)| n).sum()
    }
}

/// Entry of `neighborhoods.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodRollup {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub impacted_stops: usize,
    pub total_barriers: usize,
    pub friction_intensity: f64,
}

/// Entry of `routes.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRollup {
    pub route: String,
    pub total_friction: usize,
    pub impacted_stops: usize,
    pub friction_per_stop: f64,
}
