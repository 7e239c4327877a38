//! Stop-to-barrier proximity matching.
//!
//! A barrier matches a stop when it lies within `threshold` degrees of the
//! stop on both axes independently (an axis-aligned square, not a radius).
//! The grid scan visits the stop's cell and its eight neighbours, which finds
//! every such barrier as long as `threshold <= grid_size / 2`.
//! [`PipelineConfig::validate`](crate::config::PipelineConfig::validate)
//! enforces that bound; widening the threshold requires widening the scan.

use std::collections::HashSet;

use crate::grid::{CellKey, GridIndex};
use crate::types::{Barrier, Stop};

fn within(barrier: &Barrier, stop: &Stop, threshold: f64) -> bool {
    (barrier.lon - stop.lon).abs() <= threshold && (barrier.lat - stop.lat).abs() <= threshold
}

/// Returns the countable barriers near `stop`, deduplicated by id.
///
/// Temporary and unrated barriers are dropped before dedup, so such a copy
/// never hides a countable barrier sharing its id.
pub fn match_barriers<'a>(stop: &Stop, index: &GridIndex<'a>, threshold: f64) -> Vec<&'a Barrier> {
    let center = CellKey::of(stop.lon, stop.lat, index.grid_size());
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for cell in center.neighborhood() {
        for &barrier in index.query(cell) {
            if barrier.is_countable()
                && within(barrier, stop, threshold)
                && seen.insert(barrier.id.as_str())
            {
                matched.push(barrier);
            }
        }
    }

    matched
}

/// Linear scan over every barrier with the same acceptance test.
///
/// Reference for [`match_barriers`]; same dedup rule, input order.
pub fn brute_force_match<'a>(stop: &Stop, barriers: &'a [Barrier], threshold: f64) -> Vec<&'a Barrier> {
    let mut seen = HashSet::new();
    barriers
        .iter()
        .filter(|&b| {
            b.is_countable() && within(b, stop, threshold) && seen.insert(b.id.as_str())
        })
        .collect()
}
