//! Exact inference over discrete Bayesian networks.
//!
//! The network-building code talks to inference only through
//! [`DiscreteGraphicalModel`]; [`crate::graph::BayesNet`] implements it with
//! variable elimination over dense boolean factors.
pub mod elimination;
pub mod factor;

pub use elimination::VariableElimination;
pub use factor::Factor;

use crate::error::{HazardError, Result};
use crate::graph::{Cpt, NodeId, NodeKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Observed values keyed by node. Ordered so iteration is reproducible.
pub type Evidence = BTreeMap<NodeKey, bool>;

/// A normalized distribution over a boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub p_false: f64,
    pub p_true: f64,
}

impl Distribution {
    /// All mass on one value.
    pub fn point(value: bool) -> Self {
        if value {
            Self { p_false: 0.0, p_true: 1.0 }
        } else {
            Self { p_false: 1.0, p_true: 0.0 }
        }
    }

    /// Normalizes unnormalized weights. Fails when there is no mass to normalize,
    /// which is what contradictory evidence produces.
    pub fn from_weights(w_false: f64, w_true: f64) -> Result<Self> {
        let total = w_false + w_true;
        if !total.is_finite() || total <= 0.0 {
            return Err(HazardError::InferenceFailure(format!(
                "evidence has zero probability (normalizer {})",
                total
            )));
        }
        Ok(Self { p_false: w_false / total, p_true: w_true / total })
    }
}

/// The capability the temporal model needs from an inference engine.
pub trait DiscreteGraphicalModel {
    /// Registers a node. `parents` must already exist and be listed in the
    /// same order the table's rows are encoded in.
    fn add_node(&mut self, key: NodeKey, parents: &[NodeKey], table: Cpt) -> Result<NodeId>;

    /// Posterior of `target` given `evidence`.
    fn query(&self, target: NodeKey, evidence: &Evidence) -> Result<Distribution>;
}
