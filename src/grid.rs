//! Fixed-size grid bucketing of barriers for proximity lookups.

use std::collections::HashMap;

use crate::types::Barrier;

/// Cell coordinates: each axis divided by the grid size and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(pub i64, pub i64);

impl CellKey {
    pub fn of(lon: f64, lat: f64, grid_size: f64) -> Self {
        CellKey(
            (lon / grid_size).round() as i64,
            (lat / grid_size).round() as i64,
        )
    }

    /// The 3x3 block centered on this cell, row by row.
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| CellKey(self.0 + dx, self.1 + dy)))
    }
}

/// Immutable partition of barriers by cell. Shared read-only across join workers.
pub struct GridIndex<'a> {
    grid_size: f64,
    cells: HashMap<CellKey, Vec<&'a Barrier>>,
}

impl<'a> GridIndex<'a> {
    pub fn build(barriers: &'a [Barrier], grid_size: f64) -> Self {
        let mut cells: HashMap<CellKey, Vec<&'a Barrier>> = HashMap::new();
        for barrier in barriers {
            cells
                .entry(CellKey::of(barrier.lon, barrier.lat, grid_size))
                .or_default()
                .push(barrier);
        }
        Self { grid_size, cells }
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Barriers bucketed under `key`, in input order.
    pub fn query(&self, key: CellKey) -> &[&'a Barrier] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}
