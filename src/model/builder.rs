//! Unrolls the static facility across time into a Bayesian network.
use super::facility::{Facility, ObservationLog};
use super::transition::{prior_table, sensor_table, transition_table};
use crate::error::{HazardError, Result};
use crate::graph::{BayesNet, Cpt, LocationId, NodeKey};
use smallvec::SmallVec;
use tracing::debug;

/// Tables used while unrolling, indexed by location and sensor id.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkTables {
    pub prior: Cpt,
    pub transitions: Vec<Cpt>,
    pub sensors: Vec<Cpt>,
}

impl NetworkTables {
    pub fn for_facility(facility: &Facility, initial_hazard_probability: f64) -> Result<Self> {
        let transitions = facility
            .parents()
            .iter()
            .map(|(_, parents)| transition_table(parents.len(), facility.propagation()))
            .collect::<Result<Vec<_>>>()?;
        let sensors = facility
            .sensors()
            .iter()
            .map(|s| sensor_table(s.tpr, s.fpr))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { prior: prior_table(initial_hazard_probability)?, transitions, sensors })
    }
}

/// The unrolled network: one hazard node per location and step, one
/// observation node per recorded reading.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalNetwork {
    model: BayesNet,
    steps: usize,
    locations: usize,
}

impl TemporalNetwork {
    /// Unrolls `facility` over the steps of `log`.
    ///
    /// Nodes are inserted step by step in declaration order, then the
    /// observation nodes in step and reading order, so identical inputs always
    /// produce an identical network.
    pub fn build(facility: &Facility, log: &ObservationLog, tables: &NetworkTables) -> Result<Self> {
        let steps = log.steps();
        if facility.locations().is_empty() {
            return Err(HazardError::EmptyModel("no locations declared".into()));
        }
        if steps == 0 {
            return Err(HazardError::EmptyModel("no time steps recorded".into()));
        }
        let mut model = BayesNet::new();

        for location in facility.location_ids() {
            model.add_node(NodeKey::hazard(location, 0), &[], tables.prior.clone())?;
        }

        for step in 1..steps {
            for (location, parents) in facility.parents().iter() {
                let parent_keys: SmallVec<[NodeKey; 8]> =
                    parents.iter().map(|&p| NodeKey::hazard(p, step - 1)).collect();
                model.add_node(
                    NodeKey::hazard(location, step),
                    &parent_keys,
                    tables.transitions[location.index()].clone(),
                )?;
            }
        }

        let mut observations = 0usize;
        for (step, sensor, _) in log.iter() {
            let key = NodeKey::observation(sensor, step);
            // A repeated reading reuses the node; conflicts are the binder's concern.
            if model.id_of(&key).is_some() {
                continue;
            }
            let installed_in = facility.sensor(sensor).location;
            model.add_node(key, &[NodeKey::hazard(installed_in, step)], tables.sensors[sensor.index()].clone())?;
            observations += 1;
        }

        debug!(
            locations = facility.locations().len(),
            steps,
            observations,
            nodes = model.node_count(),
            "unrolled temporal network"
        );

        Ok(Self { model, steps, locations: facility.locations().len() })
    }

    /// Convenience wrapper deriving the tables from the facility itself.
    pub fn from_facility(facility: &Facility, log: &ObservationLog, initial_hazard_probability: f64) -> Result<Self> {
        let tables = NetworkTables::for_facility(facility, initial_hazard_probability)?;
        Self::build(facility, log, &tables)
    }

    pub fn model(&self) -> &BayesNet { &self.model }
    pub fn steps(&self) -> usize { self.steps }
    pub fn location_count(&self) -> usize { self.locations }

    pub fn final_step(&self) -> usize { self.steps - 1 }

    /// Key of a hazard node, checked against the modeled range.
    pub fn hazard_key(&self, location: LocationId, step: usize) -> Result<NodeKey> {
        if step >= self.steps {
            return Err(HazardError::InvalidTimeStep { step, steps: self.steps });
        }
        Ok(NodeKey::hazard(location, step))
    }
}
