//! Defines the identity of a node in the unrolled network and the
//! conditional probability table it carries.

use crate::error::{check_probability, HazardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tables wider than this are refused; each extra parent doubles the row count.
pub const MAX_ARITY: usize = 24;

/// Dense index of a declared location, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl LocationId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Dense index of a declared sensor, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SensorId(pub u32);

impl SensorId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// The identity of a random variable in the time-unrolled network.
///
/// Hazard and observation variables live in separate variants, so a location
/// and a sensor that happen to share a name (or an index) can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKey {
    /// Hazard state of a location at a time step.
    Hazard { location: LocationId, step: usize },
    /// A sensor reading taken at a time step.
    Observation { sensor: SensorId, step: usize },
}

impl NodeKey {
    pub fn hazard(location: LocationId, step: usize) -> Self {
        Self::Hazard { location, step }
    }

    pub fn observation(sensor: SensorId, step: usize) -> Self {
        Self::Observation { sensor, step }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hazard { location, step } => write!(f, "hazard[L{}]@{}", location.0, step),
            Self::Observation { sensor, step } => write!(f, "reading[S{}]@{}", sensor.0, step),
        }
    }
}

/// A conditional probability table for a boolean node.
///
/// Stores `P(node = true | parents)` for every parent assignment. Row `r`
/// encodes the assignment in binary with the first parent as the most
/// significant bit, so rows run in lexicographic order with `false < true`.
/// A zero-parent table holds a single unconditional probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Cpt {
    arity: usize,
    p_true: Vec<f64>,
}

impl Cpt {
    /// An unconditional Bernoulli table.
    pub fn unconditional(p_true: f64) -> Result<Self> {
        Self::from_rows(0, vec![p_true])
    }

    /// Builds a table from `2^arity` rows in canonical order.
    pub fn from_rows(arity: usize, p_true: Vec<f64>) -> Result<Self> {
        if arity > MAX_ARITY {
            return Err(HazardError::structure(format!(
                "table with {} parents exceeds the supported maximum of {}",
                arity, MAX_ARITY
            )));
        }
        if p_true.len() != 1 << arity {
            return Err(HazardError::structure(format!(
                "table for {} parents needs {} rows, got {}",
                arity,
                1usize << arity,
                p_true.len()
            )));
        }
        for &p in &p_true {
            check_probability("cpt row", p)?;
        }
        Ok(Self { arity, p_true })
    }

    pub fn arity(&self) -> usize { self.arity }

    #[cfg(test)]
    pub fn row_count(&self) -> usize { self.p_true.len() }

    #[inline(always)]
    pub fn p_true_at(&self, row: usize) -> f64 { self.p_true[row] }

    /// Looks up the row for a parent assignment given in canonical parent order.
    #[cfg(test)]
    pub fn p_true(&self, assignment: &[bool]) -> Option<f64> {
        if assignment.len() != self.arity {
            return None;
        }
        Some(self.p_true[Self::row_index(assignment)])
    }

    /// Iterates `(assignment, P(true))` pairs in canonical order.
    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = (Vec<bool>, f64)> + '_ {
        self.p_true
            .iter()
            .enumerate()
            .map(move |(row, &p)| (Self::assignment(self.arity, row), p))
    }

    pub fn row_index(assignment: &[bool]) -> usize {
        assignment.iter().fold(0, |acc, &bit| (acc << 1) | bit as usize)
    }

    #[cfg(test)]
    pub fn assignment(arity: usize, row: usize) -> Vec<bool> {
        (0..arity).map(|i| (row >> (arity - 1 - i)) & 1 == 1).collect()
    }
}
