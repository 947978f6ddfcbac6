//! Dense factors over boolean variables.
//!
//! A factor over `n` variables stores `2^n` weights. Entry `i` encodes the
//! assignment in binary with `vars[0]` as the most significant bit, matching
//! the row layout of [`Cpt`].

use crate::graph::{Cpt, NodeId};
use smallvec::SmallVec;
use std::collections::HashMap;

pub type VarList = SmallVec<[NodeId; 8]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    vars: VarList,
    values: Vec<f64>,
}

#[inline(always)]
fn bit(idx: usize, pos: usize, width: usize) -> usize {
    (idx >> (width - 1 - pos)) & 1
}

/// Where a family member's value comes from when expanding a CPT.
#[derive(Clone, Copy)]
enum Slot {
    Observed(bool),
    Free(usize),
}

impl Factor {
    /// The multiplicative identity.
    pub fn unit() -> Self {
        Self { vars: VarList::new(), values: vec![1.0] }
    }

    /// Expands the CPT of `node` into a factor over its family, with observed
    /// members fixed to their value and dropped from the scope.
    pub fn from_cpt(node: NodeId, parents: &[NodeId], table: &Cpt, evidence: &HashMap<NodeId, bool>) -> Self {
        let mut vars = VarList::new();
        let mut slot_for = |member: NodeId| match evidence.get(&member) {
            Some(&value) => Slot::Observed(value),
            None => {
                vars.push(member);
                Slot::Free(vars.len() - 1)
            }
        };
        let parent_slots: SmallVec<[Slot; 8]> = parents.iter().map(|&p| slot_for(p)).collect();
        let node_slot = slot_for(node);

        let width = vars.len();
        let values = (0..1usize << width)
            .map(|idx| {
                let value_of = |slot: Slot| match slot {
                    Slot::Observed(v) => v,
                    Slot::Free(pos) => bit(idx, pos, width) == 1,
                };
                let row = parent_slots.iter().fold(0usize, |acc, &s| (acc << 1) | value_of(s) as usize);
                let p_true = table.p_true_at(row);
                if value_of(node_slot) { p_true } else { 1.0 - p_true }
            })
            .collect();

        Self { vars, values }
    }

    pub fn vars(&self) -> &[NodeId] { &self.vars }
    pub fn values(&self) -> &[f64] { &self.values }
    pub fn width(&self) -> usize { self.vars.len() }
    pub fn contains(&self, var: NodeId) -> bool { self.vars.contains(&var) }

    /// Weight of an assignment given in `vars()` order.
    pub fn get(&self, assignment: &[bool]) -> Option<f64> {
        if assignment.len() != self.vars.len() {
            return None;
        }
        Some(self.values[Cpt::row_index(assignment)])
    }

    /// Pointwise product. The result scope is `self`'s variables followed by
    /// any of `other`'s that `self` lacks.
    pub fn product(&self, other: &Factor) -> Factor {
        let mut vars = self.vars.clone();
        let (na, nb) = (self.vars.len(), other.vars.len());
        // Position of each of self's / other's variables in the result scope.
        let pos_a: SmallVec<[usize; 8]> = (0..na).collect();
        let pos_b: SmallVec<[usize; 8]> = other
            .vars
            .iter()
            .map(|v| match vars.iter().position(|x| x == v) {
                Some(p) => p,
                None => {
                    vars.push(*v);
                    vars.len() - 1
                }
            })
            .collect();
        let width = vars.len();

        let values = (0..1usize << width)
            .map(|idx| {
                let ia = pos_a.iter().fold(0usize, |acc, &p| (acc << 1) | bit(idx, p, width));
                let ib = pos_b.iter().fold(0usize, |acc, &p| (acc << 1) | bit(idx, p, width));
                debug_assert!(ia < 1 << na && ib < 1 << nb);
                self.values[ia] * other.values[ib]
            })
            .collect();

        Factor { vars, values }
    }

    /// Marginalizes `var` out. A factor that does not mention `var` is returned unchanged.
    pub fn sum_out(&self, var: NodeId) -> Factor {
        let Some(pos) = self.vars.iter().position(|&v| v == var) else {
            return self.clone();
        };
        let width = self.vars.len();
        let shift = width - 1 - pos;
        let low_mask = (1usize << shift) - 1;

        let mut values = vec![0.0; 1 << (width - 1)];
        for (idx, &w) in self.values.iter().enumerate() {
            let out = ((idx >> (shift + 1)) << shift) | (idx & low_mask);
            values[out] += w;
        }

        let mut vars = self.vars.clone();
        vars.remove(pos);
        Factor { vars, values }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Scales the weights to sum to one. `None` when there is no mass to scale.
    pub fn normalized(mut self) -> Option<Factor> {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        self.values.iter_mut().for_each(|w| *w /= total);
        Some(self)
    }
}
