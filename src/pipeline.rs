//! Grid index → proximity join → stop summaries → rollups.

use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use crate::config::PipelineConfig;
use crate::grid::GridIndex;
use crate::join::match_barriers;
use crate::rollup::{neighborhood_rollup, route_rollup};
use crate::summarize::summarize;
use crate::types::{Barrier, NeighborhoodRollup, RouteRollup, Stop, StopRecord};

/// The three output tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub stops: Vec<StopRecord>,
    pub neighborhoods: Vec<NeighborhoodRollup>,
    pub routes: Vec<RouteRollup>,
}

/// Profiles every stop against the barrier set. Output order follows `stops`.
///
/// Each stop only reads the shared index, so stops are processed in parallel.
pub fn profile_stops(index: &GridIndex<'_>, stops: &[Stop], threshold: f64) -> Vec<StopRecord> {
    stops
        .par_iter()
        .map(|stop| summarize(stop, &match_barriers(stop, index, threshold)))
        .collect()
}

/// Runs the full batch. Fails before doing any work if `config` is invalid.
#[tracing::instrument(skip_all, fields(barriers = barriers.len(), stops = stops.len()))]
pub fn run(config: &PipelineConfig, barriers: &[Barrier], stops: &[Stop]) -> Result<Artifacts> {
    config.validate()?;

    let index = GridIndex::build(barriers, config.grid_size);
    info!(cells = index.cell_count(), grid_size = config.grid_size, "Grid index built");

    let records = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            pool.install(|| profile_stops(&index, stops, config.threshold))
        }
        None => profile_stops(&index, stops, config.threshold),
    };

    let matched = records.iter().filter(|r| r.total_barriers > 0).count();
    info!(stops = records.len(), with_barriers = matched, "Stops profiled");

    let neighborhoods = neighborhood_rollup(&records, config.min_severity);
    let routes = route_rollup(&records, config.min_severity);
    info!(
        neighborhoods = neighborhoods.len(),
        routes = routes.len(),
        min_severity = config.min_severity,
        "Rollups computed"
    );

    Ok(Artifacts {
        stops: records,
        neighborhoods,
        routes,
    })
}
