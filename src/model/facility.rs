//! Validated, index-based view of a [`Problem`].
use super::problem::{Problem, Reading};
use super::topology::{parents_of, ParentSets};
use crate::error::{check_probability, HazardError, Result};
use crate::graph::{LocationId, SensorId};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SensorSpec {
    pub name: String,
    pub location: LocationId,
    pub tpr: f64,
    pub fpr: f64,
}

/// Readings per step with sensors resolved to ids, in recorded order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationLog {
    pub rounds: Vec<Vec<(SensorId, bool)>>,
}

impl ObservationLog {
    pub fn steps(&self) -> usize { self.rounds.len() }

    /// `(step, sensor, value)` in step order, then recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, SensorId, bool)> + '_ {
        self.rounds
            .iter()
            .enumerate()
            .flat_map(|(step, round)| round.iter().map(move |&(sensor, value)| (step, sensor, value)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    locations: Vec<String>,
    sensors: Vec<SensorSpec>,
    sensor_ids: HashMap<String, SensorId>,
    parents: ParentSets,
    propagation: f64,
}

impl Facility {
    /// Interns names and validates every probability and cross-reference.
    pub fn from_problem(problem: &Problem) -> Result<Self> {
        let parents = parents_of(&problem.locations, &problem.connections)?;
        let propagation = check_probability("propagation", problem.propagation)?;

        let location_ids: HashMap<&str, LocationId> = problem
            .locations
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), LocationId::new(i)))
            .collect();

        let mut sensors = Vec::with_capacity(problem.sensors.len());
        let mut sensor_ids = HashMap::with_capacity(problem.sensors.len());
        for sensor in &problem.sensors {
            let location = *location_ids.get(sensor.location.as_str()).ok_or_else(|| HazardError::MalformedTopology {
                location: sensor.location.clone(),
                reason: format!("sensor '{}' is installed in an undeclared location", sensor.name),
            })?;
            let id = SensorId::new(sensors.len());
            if sensor_ids.insert(sensor.name.clone(), id).is_some() {
                return Err(HazardError::structure(format!("sensor '{}' declared more than once", sensor.name)));
            }
            sensors.push(SensorSpec {
                name: sensor.name.clone(),
                location,
                tpr: check_probability(&format!("{} tpr", sensor.name), sensor.tpr)?,
                fpr: check_probability(&format!("{} fpr", sensor.name), sensor.fpr)?,
            });
        }

        Ok(Self { locations: problem.locations.clone(), sensors, sensor_ids, parents, propagation })
    }

    /// Resolves sensor names in `readings`, failing on undeclared sensors.
    pub fn intern_readings(&self, readings: &[Vec<Reading>]) -> Result<ObservationLog> {
        let rounds = readings
            .iter()
            .enumerate()
            .map(|(step, round)| {
                round
                    .iter()
                    .map(|r| {
                        self.sensor_id(&r.sensor)
                            .map(|id| (id, r.value))
                            .ok_or_else(|| HazardError::UnknownSensor { sensor: r.sensor.clone(), step })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ObservationLog { rounds })
    }

    pub fn locations(&self) -> &[String] { &self.locations }
    pub fn location_name(&self, id: LocationId) -> &str { &self.locations[id.index()] }
    pub fn location_ids(&self) -> impl Iterator<Item = LocationId> { (0..self.locations.len()).map(LocationId::new) }

    pub fn sensors(&self) -> &[SensorSpec] { &self.sensors }
    pub fn sensor(&self, id: SensorId) -> &SensorSpec { &self.sensors[id.index()] }
    pub fn sensor_id(&self, name: &str) -> Option<SensorId> { self.sensor_ids.get(name).copied() }

    pub fn parents(&self) -> &ParentSets { &self.parents }
    pub fn propagation(&self) -> f64 { self.propagation }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::Sensor;

    fn problem() -> Problem {
        Problem {
            locations: vec!["a".into(), "b".into()],
            connections: vec![("a".into(), "b".into())],
            sensors: vec![Sensor { name: "s1".into(), location: "b".into(), tpr: 0.9, fpr: 0.1 }],
            propagation: 0.8,
            readings: vec![vec![], vec![Reading { sensor: "s1".into(), value: true }]],
        }
    }

    #[test]
    fn test_interns_in_declaration_order() {
        let facility = Facility::from_problem(&problem()).unwrap();
        assert_eq!(facility.location_name(LocationId(1)), "b");
        assert_eq!(facility.sensor(SensorId(0)).location, LocationId(1));
        let log = facility.intern_readings(&problem().readings).unwrap();
        assert_eq!(log.steps(), 2);
        assert_eq!(log.iter().collect::<Vec<_>>(), vec![(1, SensorId(0), true)]);
    }

    #[test]
    fn test_sensor_in_undeclared_location() {
        let mut p = problem();
        p.sensors[0].location = "attic".into();
        let err = Facility::from_problem(&p).unwrap_err();
        assert!(matches!(err, HazardError::MalformedTopology { ref location, .. } if location == "attic"));
    }

    #[test]
    fn test_out_of_range_rates_are_rejected() {
        let mut p = problem();
        p.sensors[0].tpr = 1.2;
        assert!(matches!(Facility::from_problem(&p), Err(HazardError::InvalidProbability { .. })));
        let mut p = problem();
        p.propagation = -0.5;
        assert!(matches!(Facility::from_problem(&p), Err(HazardError::InvalidProbability { .. })));
    }

    #[test]
    fn test_unknown_sensor_in_readings() {
        let facility = Facility::from_problem(&problem()).unwrap();
        let readings = vec![vec![Reading { sensor: "s9".into(), value: false }]];
        let err = facility.intern_readings(&readings).unwrap_err();
        assert_eq!(err, HazardError::UnknownSensor { sensor: "s9".into(), step: 0 });
    }
}
