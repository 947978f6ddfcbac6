//! Picks the location most likely to be hazardous at a given step.
use super::builder::TemporalNetwork;
use crate::error::{HazardError, Result};
use crate::graph::{LocationId, NodeKey};
use crate::inference::{DiscreteGraphicalModel, Evidence};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// How the per-location queries are scheduled. Both modes give the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    Sequential,
    /// One query per location on the rayon pool, sharing the model and evidence.
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Belief {
    pub location: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The winning location.
    pub location: String,
    /// Its posterior probability of being hazardous.
    pub probability: f64,
    pub step: usize,
    /// Every location's posterior, in declaration order.
    pub beliefs: Vec<Belief>,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.location, self.probability)
    }
}

/// Posteriors closer than this are treated as tied. Different targets are
/// eliminated in different orders, so equal beliefs can differ in the last bits.
const TIE_TOLERANCE: f64 = 1e-12;

/// Index of the winning belief: the first one within [`TIE_TOLERANCE`] of the maximum.
fn winner(beliefs: &[Belief]) -> usize {
    let mut best = 0;
    for (i, belief) in beliefs.iter().enumerate().skip(1) {
        let best_p = beliefs[best].probability;
        if belief.probability > best_p + TIE_TOLERANCE * best_p.max(1.0) {
            best = i;
        }
    }
    best
}

fn posterior<M: DiscreteGraphicalModel + ?Sized>(model: &M, key: NodeKey, evidence: &Evidence) -> Result<f64> {
    model.query(key, evidence).map(|d| d.p_true)
}

/// Queries every location's hazard node at `step` and returns the most likely one.
///
/// Ties go to the location declared first.
pub fn resolve(
    network: &TemporalNetwork,
    evidence: &Evidence,
    locations: &[String],
    step: usize,
    mode: QueryMode,
) -> Result<Resolution> {
    if locations.is_empty() {
        return Err(HazardError::EmptyModel("no locations to rank".into()));
    }
    if locations.len() > network.location_count() {
        return Err(HazardError::structure(format!(
            "{} locations requested but the network models {}",
            locations.len(),
            network.location_count()
        )));
    }
    let model = network.model();
    let query = |(i, name): (usize, &String)| -> Result<Belief> {
        let key = network.hazard_key(LocationId::new(i), step)?;
        let probability = posterior(model, key, evidence)?;
        debug!(location = %name, step, probability, "posterior");
        Ok(Belief { location: name.clone(), probability })
    };

    let beliefs = match mode {
        QueryMode::Sequential => locations.iter().enumerate().map(query).collect::<Result<Vec<_>>>()?,
        QueryMode::Parallel => locations.par_iter().enumerate().map(query).collect::<Result<Vec<_>>>()?,
    };

    let best = winner(&beliefs);
    Ok(Resolution {
        location: beliefs[best].location.clone(),
        probability: beliefs[best].probability,
        step,
        beliefs,
    })
}
