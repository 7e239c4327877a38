use std::collections::HashMap;

use crate::rollup::utility::{ratio, round_to};
use crate::types::{RouteRollup, StopRecord};

/// Sums severe barriers over the impacted stops of each route.
///
/// A stop served by several routes counts toward each of them. Output is
/// sorted by `total_friction`, highest first.
pub fn route_rollup(records: &[StopRecord], min_severity: u8) -> Vec<RouteRollup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, usize, usize)> = Vec::new();

    for record in records {
        let severe = record.severe_count(min_severity);
        if severe == 0 {
            continue;
        }

        for route in &record.routes {
            let slot = *slots.entry(route.as_str()).or_insert_with(|| {
                totals.push((route.as_str(), 0, 0));
                totals.len() - 1
            });
            let (_, friction, stops) = &mut totals[slot];
            *friction += severe;
            *stops += 1;
        }
    }

    let mut rollups: Vec<RouteRollup> = totals
        .into_iter()
        .map(|(route, friction, stops)| RouteRollup {
            route: route.to_string(),
            total_friction: friction,
            impacted_stops: stops,
            friction_per_stop: round_to(ratio(friction, stops), 2),
        })
        .collect();

    rollups.sort_by(|a, b| b.total_friction.cmp(&a.total_friction));
    rollups
}
