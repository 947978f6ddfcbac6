//! storage.rs
//! Dense columnar node store with CSR parent lists.

use super::node::{Cpt, NodeKey};
use crate::error::{HazardError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub keys: Vec<NodeKey>,
    pub tables: Vec<Cpt>,

    // Dense Topology
    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>,

    // Lookup only, never iterated.
    index: HashMap<NodeKey, NodeId>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.keys.len() }

    /// Appends a node. Parents must already be registered, which keeps the
    /// store acyclic and its insertion order a valid topological order.
    pub fn add_node(&mut self, key: NodeKey, parents: &[NodeId], table: Cpt) -> Result<NodeId> {
        if self.index.contains_key(&key) {
            return Err(HazardError::structure(format!("node {} registered twice", key)));
        }
        if table.arity() != parents.len() {
            return Err(HazardError::structure(format!(
                "node {} has {} parents but its table expects {}",
                key,
                parents.len(),
                table.arity()
            )));
        }
        let count = self.count();
        if let Some(bad) = parents.iter().find(|p| p.index() >= count) {
            return Err(HazardError::structure(format!(
                "node {} refers to unknown parent {:?}",
                key, bad
            )));
        }
        for (i, p) in parents.iter().enumerate() {
            if parents[..i].contains(p) {
                return Err(HazardError::structure(format!(
                    "node {} lists parent {} twice",
                    key, self.keys[p.index()]
                )));
            }
        }

        let id = NodeId::new(count);

        // 1. Parents (CSR append)
        let start = self.parents_flat.len() as u32;
        self.parents_flat.extend_from_slice(parents);
        self.parents_ranges.push((start, parents.len() as u32));

        // 2. Payload
        self.keys.push(key);
        self.tables.push(table);
        self.index.insert(key, id);

        Ok(id)
    }

    pub fn lookup(&self, key: &NodeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.parents_ranges[id.index()];
        &self.parents_flat[start as usize..(start + count) as usize]
    }
}
