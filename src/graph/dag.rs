//! dag.rs
//! Wraps the low-level Registry with keyed construction and ancestor search.

use super::node::{Cpt, NodeKey};
use super::storage::{NodeId, Registry};
use crate::error::{HazardError, Result};
use crate::inference::{DiscreteGraphicalModel, Distribution, Evidence, VariableElimination};
use std::collections::{HashSet, VecDeque};

/// A discrete Bayesian network over boolean variables.
///
/// Nodes are appended parents-first, so the network is acyclic by
/// construction. Two networks compare equal when they hold the same keys in
/// the same order with the same parent lists and tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BayesNet {
    pub(crate) store: Registry,
}

impl BayesNet {
    pub fn new() -> Self { Self::default() }

    /// Adds a node whose parents are given by key, in table order.
    pub fn add_node(&mut self, key: NodeKey, parents: &[NodeKey], table: Cpt) -> Result<NodeId> {
        let parent_ids = parents
            .iter()
            .map(|p| {
                self.store.lookup(p).ok_or_else(|| {
                    HazardError::structure(format!("parent {} of {} is not in the network", p, key))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.store.add_node(key, &parent_ids, table)
    }

    pub fn node_count(&self) -> usize { self.store.count() }

    /// The start nodes plus all of their ancestors.
    pub fn upstream_from(&self, start_nodes: &[NodeId]) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from(start_nodes.to_vec());

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) {
                for &parent in self.store.get_parents(node) {
                    queue.push_back(parent);
                }
            }
        }
        visited
    }

    // --- Accessors ---
    pub fn id_of(&self, key: &NodeKey) -> Option<NodeId> { self.store.lookup(key) }
    pub fn key_of(&self, id: NodeId) -> NodeKey { self.store.keys[id.index()] }
    pub fn table_of(&self, id: NodeId) -> &Cpt { &self.store.tables[id.index()] }
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] { self.store.get_parents(id) }

    /// Parent keys of a node, in table order.
    pub fn parent_keys(&self, key: &NodeKey) -> Option<Vec<NodeKey>> {
        let id = self.id_of(key)?;
        Some(self.get_parents(id).iter().map(|&p| self.key_of(p)).collect())
    }

    /// All node keys in insertion order.
    pub fn keys(&self) -> &[NodeKey] { &self.store.keys }
}

impl DiscreteGraphicalModel for BayesNet {
    fn add_node(&mut self, key: NodeKey, parents: &[NodeKey], table: Cpt) -> Result<NodeId> {
        BayesNet::add_node(self, key, parents, table)
    }

    fn query(&self, target: NodeKey, evidence: &Evidence) -> Result<Distribution> {
        VariableElimination::new(self).query(target, evidence)
    }
}
