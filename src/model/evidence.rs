//! Turns recorded readings into the evidence map used to condition queries.
use super::facility::{Facility, ObservationLog};
use crate::error::{HazardError, Result};
use crate::graph::NodeKey;
use crate::inference::Evidence;
use std::collections::btree_map::Entry;

/// One entry per recorded reading, keyed by its observation node.
///
/// A sensor that did not report in a round contributes nothing. Repeating a
/// reading with the same value is harmless; repeating it with a different
/// value is a [`HazardError::ConflictingEvidence`].
pub fn bind(facility: &Facility, log: &ObservationLog) -> Result<Evidence> {
    let mut evidence = Evidence::new();
    for (step, sensor, value) in log.iter() {
        match evidence.entry(NodeKey::observation(sensor, step)) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(seen) if *seen.get() == value => {}
            Entry::Occupied(_) => {
                return Err(HazardError::ConflictingEvidence {
                    sensor: facility.sensor(sensor).name.clone(),
                    step,
                })
            }
        }
    }
    Ok(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SensorId;
    use crate::model::problem::{Problem, Sensor};

    fn facility() -> Facility {
        Facility::from_problem(&Problem {
            locations: vec!["a".into()],
            sensors: vec![
                Sensor { name: "s1".into(), location: "a".into(), tpr: 0.9, fpr: 0.1 },
                Sensor { name: "s2".into(), location: "a".into(), tpr: 0.8, fpr: 0.2 },
            ],
            ..Default::default()
        })
        .unwrap()
    }

    fn log(rounds: Vec<Vec<(u32, bool)>>) -> ObservationLog {
        ObservationLog {
            rounds: rounds.into_iter().map(|r| r.into_iter().map(|(s, v)| (SensorId(s), v)).collect()).collect(),
        }
    }

    #[test]
    fn test_one_entry_per_reading() {
        let evidence = bind(&facility(), &log(vec![vec![(0, true)], vec![], vec![(1, false), (0, true)]])).unwrap();
        assert_eq!(evidence.len(), 3);
        assert_eq!(evidence.get(&NodeKey::observation(SensorId(1), 2)), Some(&false));
        assert!(!evidence.contains_key(&NodeKey::observation(SensorId(1), 0)));
    }

    #[test]
    fn test_repeated_identical_reading_is_accepted() {
        let evidence = bind(&facility(), &log(vec![vec![(0, true), (0, true)]])).unwrap();
        assert_eq!(evidence.len(), 1);
    }

    #[test]
    fn test_conflicting_readings_are_rejected() {
        let err = bind(&facility(), &log(vec![vec![], vec![(1, true), (1, false)]])).unwrap_err();
        assert_eq!(err, HazardError::ConflictingEvidence { sensor: "s2".into(), step: 1 });
    }
}
