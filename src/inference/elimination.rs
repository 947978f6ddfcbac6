//! Variable elimination over the factors of a [`BayesNet`].
use super::factor::Factor;
use super::{Distribution, Evidence};
use crate::error::{HazardError, Result};
use crate::graph::{BayesNet, NodeId, NodeKey};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Live factors plus, per variable, the slots of the factors mentioning it.
#[derive(Default)]
struct FactorPool {
    slots: Vec<Option<Factor>>,
    holders: HashMap<NodeId, BTreeSet<usize>>,
}

impl FactorPool {
    fn insert(&mut self, factor: Factor) {
        let slot = self.slots.len();
        for &var in factor.vars() {
            self.holders.entry(var).or_default().insert(slot);
        }
        self.slots.push(Some(factor));
    }

    /// Removes and returns every factor mentioning `var`, in insertion order.
    fn take_holding(&mut self, var: NodeId) -> Vec<Factor> {
        let slots = self.holders.remove(&var).unwrap_or_default();
        let mut taken = Vec::with_capacity(slots.len());
        for slot in slots {
            let Some(factor) = self.slots[slot].take() else { continue };
            for other in factor.vars().iter().filter(|&&v| v != var) {
                if let Some(held) = self.holders.get_mut(other) {
                    held.remove(&slot);
                }
            }
            taken.push(factor);
        }
        taken
    }

    /// Width of the factor that eliminating `var` would build.
    fn scope_width(&self, var: NodeId) -> usize {
        let mut scope: SmallVec<[NodeId; 16]> = SmallVec::new();
        for &slot in self.holders.get(&var).into_iter().flatten() {
            if let Some(factor) = &self.slots[slot] {
                for &v in factor.vars() {
                    if !scope.contains(&v) {
                        scope.push(v);
                    }
                }
            }
        }
        scope.len()
    }

    fn into_factors(self) -> impl Iterator<Item = Factor> {
        self.slots.into_iter().flatten()
    }
}

/// A single-query variable elimination run against a borrowed network.
pub struct VariableElimination<'a> {
    net: &'a BayesNet,
}

impl<'a> VariableElimination<'a> {
    pub fn new(net: &'a BayesNet) -> Self {
        Self { net }
    }

    /// Computes `P(target | evidence)`.
    ///
    /// Only the target, the evidence nodes and their ancestors take part; every
    /// other node is barren and sums out to one. Hidden variables are
    /// eliminated greedily, always picking the one whose combined factor is
    /// smallest (lowest node id on ties). Intermediate factors are rescaled to
    /// unit mass, so long observation sequences do not underflow.
    pub fn query(&self, target: NodeKey, evidence: &Evidence) -> Result<Distribution> {
        let target_id = self.resolve(&target)?;
        let mut observed = HashMap::with_capacity(evidence.len());
        for (key, &value) in evidence {
            observed.insert(self.resolve(key)?, value);
        }

        let mut seeds: Vec<NodeId> = observed.keys().copied().collect();
        seeds.push(target_id);
        let relevant: BTreeSet<NodeId> = self.net.upstream_from(&seeds).into_iter().collect();

        let mut pool = FactorPool::default();
        let mut widest = 0;
        for &id in &relevant {
            let factor = Factor::from_cpt(id, self.net.get_parents(id), self.net.table_of(id), &observed);
            widest = widest.max(factor.width());
            pool.insert(factor);
        }

        // (width, var) pairs; the first entry is always the next variable to eliminate.
        let mut cost: HashMap<NodeId, usize> = HashMap::new();
        let mut queue: BTreeSet<(usize, NodeId)> = BTreeSet::new();
        for &id in relevant.iter().filter(|&&id| id != target_id && !observed.contains_key(&id)) {
            let width = pool.scope_width(id);
            cost.insert(id, width);
            queue.insert((width, id));
        }

        while let Some((_, var)) = queue.pop_first() {
            cost.remove(&var);
            let joined = pool.take_holding(var).iter().fold(Factor::unit(), |acc, f| acc.product(f));
            widest = widest.max(joined.width());
            let summed = self.rescale(joined.sum_out(var), &target)?;
            let touched: SmallVec<[NodeId; 16]> = summed.vars().iter().copied().collect();
            pool.insert(summed);

            for v in touched {
                if let Some(old) = cost.get(&v).copied() {
                    let width = pool.scope_width(v);
                    queue.remove(&(old, v));
                    queue.insert((width, v));
                    cost.insert(v, width);
                }
            }
        }

        let mut result = Factor::unit();
        for factor in pool.into_factors() {
            result = self.rescale(result.product(&factor), &target)?;
        }
        trace!(query = %target, factors = relevant.len(), widest, "eliminated");

        match observed.get(&target_id) {
            // The target is itself observed; reaching here means the evidence has mass.
            Some(&value) => Ok(Distribution::point(value)),
            None => match result.get(&[false]).zip(result.get(&[true])) {
                Some((w_false, w_true)) => Distribution::from_weights(w_false, w_true),
                None => Err(HazardError::InferenceFailure(format!(
                    "elimination left {} variables instead of the target {}",
                    result.width(),
                    target
                ))),
            },
        }
    }

    fn resolve(&self, key: &NodeKey) -> Result<NodeId> {
        self.net
            .id_of(key)
            .ok_or_else(|| HazardError::structure(format!("node {} is not in the network", key)))
    }

    fn rescale(&self, factor: Factor, target: &NodeKey) -> Result<Factor> {
        factor.normalized().ok_or_else(|| {
            HazardError::InferenceFailure(format!("evidence has zero probability while querying {}", target))
        })
    }
}
