use std::collections::HashMap;

use crate::rollup::utility::{mean, ratio, round_to};
use crate::types::{NeighborhoodRollup, StopRecord};

#[derive(Default)]
struct Bucket<'a> {
    name: &'a str,
    lats: Vec<f64>,
    lons: Vec<f64>,
    barriers: usize,
}

/// Groups impacted stops by neighborhood label.
///
/// Output is sorted by `friction_intensity` (severe barriers per impacted
/// stop), highest first.
pub fn neighborhood_rollup(records: &[StopRecord], min_severity: u8) -> Vec<NeighborhoodRollup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for record in records {
        let Some(name) = record.neighborhood.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let severe = record.severe_count(min_severity);
        if severe == 0 {
            continue;
        }

        let slot = *slots.entry(name).or_insert_with(|| {
            buckets.push(Bucket {
                name,
                ..Default::default()
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.lats.push(record.lat);
        bucket.lons.push(record.lon);
        bucket.barriers += severe;
    }

    let mut rollups: Vec<NeighborhoodRollup> = buckets
        .into_iter()
        .map(|b| {
            let stops = b.lats.len();
            NeighborhoodRollup {
                name: b.name.to_string(),
                lat: round_to(mean(&b.lats), 6),
                lon: round_to(mean(&b.lons), 6),
                impacted_stops: stops,
                total_barriers: b.barriers,
                friction_intensity: round_to(ratio(b.barriers, stops), 1),
            }
        })
        .collect();

    rollups.sort_by(|a, b| b.friction_intensity.total_cmp(&a.friction_intensity));
    rollups
}
