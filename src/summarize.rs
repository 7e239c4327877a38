use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::types::{Barrier, Stop, StopRecord};

/// Builds the accessibility profile of `stop` from its matched barriers.
///
/// Temporary barriers and barriers without a severity are dropped here even if
/// the caller already filtered them. Each barrier id is counted once.
pub fn summarize(stop: &Stop, matched: &[&Barrier]) -> StopRecord {
    let mut seen = HashSet::new();
    let mut severity: BTreeMap<u8, usize> = BTreeMap::new();
    let mut barrier_types = BTreeSet::new();
    let mut neighborhoods: BTreeMap<&str, usize> = BTreeMap::new();

    for barrier in matched {
        let Some(level) = barrier.severity else {
            continue;
        };
        if barrier.is_temporary || !seen.insert(barrier.id.as_str()) {
            continue;
        }

        *severity.entry(level).or_default() += 1;
        barrier_types.insert(barrier.label_type.clone());
        if let Some(name) = barrier.neighborhood.as_deref().filter(|n| !n.is_empty()) {
            *neighborhoods.entry(name).or_default() += 1;
        }
    }

    StopRecord {
        id: stop.id.clone(),
        name: stop.name.clone(),
        lat: stop.lat,
        lon: stop.lon,
        routes: stop.routes.iter().cloned().collect(),
        neighborhood: plurality(&neighborhoods),
        barrier_types: barrier_types.into_iter().collect(),
        severity,
        total_barriers: seen.len(),
    }
}

/// Most frequent label; ties go to the lexicographically smallest one.
fn plurality(counts: &BTreeMap<&str, usize>) -> Option<String> {
    // BTreeMap iterates in ascending key order and max_by_key keeps the last
    // maximum, so iterate in reverse to land on the smallest tied key.
    counts
        .iter()
        .rev()
        .max_by_key(|(_, n)| **n)
        .map(|(name, _)| (*name).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> Stop {
        Stop {
            id: "1001".to_string(),
            name: "3rd Ave & Pine St".to_string(),
            lon: -122.33,
            lat: 47.60,
            routes: BTreeSet::from(["7".to_string(), "49".to_string()]),
        }
    }

    fn barrier(id: &str, severity: Option<u8>, label: &str, nbh: Option<&str>) -> Barrier {
        Barrier {
            id: id.to_string(),
            lon: -122.3301,
            lat: 47.6003,
            severity,
            label_type: label.to_string(),
            is_temporary: false,
            neighborhood: nbh.map(str::to_string),
        }
    }

    #[test]
    fn test_single_barrier_profile() {
        let b1 = barrier("B1", Some(4), "NoCurbRamp", Some("Belltown"));
        let record = summarize(&stop(), &[&b1]);

        assert_eq!(record.severity, BTreeMap::from([(4, 1)]));
        assert_eq!(record.barrier_types, vec!["NoCurbRamp"]);
        assert_eq!(record.total_barriers, 1);
        assert_eq!(record.neighborhood.as_deref(), Some("Belltown"));
        assert_eq!(record.routes, vec!["49", "7"]);
    }

    #[test]
    fn test_temporary_and_unrated_barriers_ignored() {
        let mut temp = barrier("T1", Some(5), "Obstacle", Some("Belltown"));
        temp.is_temporary = true;
        let unrated = barrier("U1", None, "SurfaceProblem", Some("Belltown"));

        let record = summarize(&stop(), &[&temp, &unrated]);

        assert_eq!(record.total_barriers, 0);
        assert!(record.severity.is_empty());
        assert!(record.barrier_types.is_empty());
        assert_eq!(record.neighborhood, None);
    }

    #[test]
    fn test_duplicate_ids_counted_once() {
        let a = barrier("B1", Some(3), "Obstacle", None);
        let b = barrier("B1", Some(3), "Obstacle", None);
        let c = barrier("B2", Some(1), "SurfaceProblem", None);

        let record = summarize(&stop(), &[&a, &b, &c]);

        assert_eq!(record.total_barriers, 2);
        assert_eq!(record.severity, BTreeMap::from([(1, 1), (3, 1)]));
        assert_eq!(record.barrier_types, vec!["Obstacle", "SurfaceProblem"]);
        assert_eq!(record.severity.values().sum::<usize>(), record.total_barriers);
    }

    #[test]
    fn test_neighborhood_plurality() {
        let b1 = barrier("B1", Some(3), "Obstacle", Some("Fremont"));
        let b2 = barrier("B2", Some(3), "Obstacle", Some("Wallingford"));
        let b3 = barrier("B3", Some(3), "Obstacle", Some("Wallingford"));
        let b4 = barrier("B4", Some(3), "Obstacle", Some(""));

        let record = summarize(&stop(), &[&b1, &b2, &b3, &b4]);
        assert_eq!(record.neighborhood.as_deref(), Some("Wallingford"));
    }

    #[test]
    fn test_neighborhood_tie_breaks_lexicographically() {
        let b1 = barrier("B1", Some(3), "Obstacle", Some("Wallingford"));
        let b2 = barrier("B2", Some(3), "Obstacle", Some("Fremont"));

        let forward = summarize(&stop(), &[&b1, &b2]);
        let reverse = summarize(&stop(), &[&b2, &b1]);
        assert_eq!(forward.neighborhood.as_deref(), Some("Fremont"));
        assert_eq!(reverse.neighborhood, forward.neighborhood);
    }

    #[test]
    fn test_no_barriers() {
        let record = summarize(&stop(), &[]);
        assert_eq!(record.total_barriers, 0);
        assert_eq!(record.neighborhood, None);
        assert_eq!(record.id, "1001");
    }
}
