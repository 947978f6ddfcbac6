//! Derives, per location, the locations whose previous state influences it.
use crate::error::{HazardError, Result};
use crate::graph::LocationId;
use petgraph::graphmap::UnGraphMap;
use smallvec::SmallVec;
use std::collections::HashMap;

pub type ParentList = SmallVec<[LocationId; 8]>;

/// Parent sets indexed by [`LocationId`].
///
/// Each set lists the location itself first, then its neighbours in the order
/// their connection was first declared. Duplicate and self connections add
/// nothing. This order is the row order of the transition tables and the
/// wiring order of the unrolled network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSets {
    sets: Vec<ParentList>,
}

impl ParentSets {
    pub fn of(&self, location: LocationId) -> &[LocationId] {
        &self.sets[location.index()]
    }

    pub fn len(&self) -> usize { self.sets.len() }
    pub fn is_empty(&self) -> bool { self.sets.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &[LocationId])> {
        self.sets.iter().enumerate().map(|(i, s)| (LocationId::new(i), s.as_slice()))
    }
}

/// Builds the parent sets for `locations` (in declaration order) from the
/// undirected `connections`.
pub fn parents_of(locations: &[String], connections: &[(String, String)]) -> Result<ParentSets> {
    let mut ids: HashMap<&str, LocationId> = HashMap::with_capacity(locations.len());
    let mut facility: UnGraphMap<LocationId, ()> = UnGraphMap::with_capacity(locations.len(), connections.len());
    for (i, name) in locations.iter().enumerate() {
        let id = LocationId::new(i);
        if ids.insert(name.as_str(), id).is_some() {
            return Err(HazardError::MalformedTopology {
                location: name.clone(),
                reason: "location declared more than once".into(),
            });
        }
        facility.add_node(id);
    }

    let lookup = |name: &String, a: &String, b: &String| {
        ids.get(name.as_str()).copied().ok_or_else(|| HazardError::MalformedTopology {
            location: name.clone(),
            reason: format!("connection {},{} references an undeclared location", a, b),
        })
    };
    for (a, b) in connections {
        let (ia, ib) = (lookup(a, a, b)?, lookup(b, a, b)?);
        facility.add_edge(ia, ib, ());
    }

    // GraphMap keeps neighbours in edge insertion order, which is declaration order.
    let sets = (0..locations.len())
        .map(LocationId::new)
        .map(|id| {
            let mut set = ParentList::new();
            set.push(id);
            set.extend(facility.neighbors(id).filter(|&n| n != id));
            set
        })
        .collect();

    Ok(ParentSets { sets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }
    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }
    fn ids(v: &[u32]) -> Vec<LocationId> { v.iter().map(|&i| LocationId(i)).collect() }

    #[test]
    fn test_self_first_then_neighbours_in_declaration_order() {
        let rooms = names(&["hall", "lab", "vault", "shop"]);
        let sets = parents_of(&rooms, &pairs(&[("lab", "hall"), ("hall", "vault"), ("shop", "hall")])).unwrap();
        assert_eq!(sets.of(LocationId(0)), ids(&[0, 1, 2, 3]).as_slice());
        assert_eq!(sets.of(LocationId(1)), ids(&[1, 0]).as_slice());
        assert_eq!(sets.of(LocationId(2)), ids(&[2, 0]).as_slice());
        assert_eq!(sets.len(), 4);
    }

    #[test]
    fn test_isolated_location_has_only_itself() {
        let sets = parents_of(&names(&["a"]), &[]).unwrap();
        assert_eq!(sets.of(LocationId(0)), ids(&[0]).as_slice());
    }

    #[test]
    fn test_duplicate_and_self_connections_are_no_ops() {
        let rooms = names(&["a", "b"]);
        let sets = parents_of(&rooms, &pairs(&[("a", "b"), ("b", "a"), ("a", "b"), ("a", "a")])).unwrap();
        assert_eq!(sets.of(LocationId(0)), ids(&[0, 1]).as_slice());
        assert_eq!(sets.of(LocationId(1)), ids(&[1, 0]).as_slice());
    }

    #[test]
    fn test_undeclared_location_is_malformed_topology() {
        let err = parents_of(&names(&["a"]), &pairs(&[("a", "ghost")])).unwrap_err();
        match err {
            HazardError::MalformedTopology { location, reason } => {
                assert_eq!(location, "ghost");
                assert!(reason.contains("a,ghost"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_declaration_is_malformed_topology() {
        let err = parents_of(&names(&["a", "a"]), &[]).unwrap_err();
        assert!(matches!(err, HazardError::MalformedTopology { .. }));
    }

    #[test]
    fn test_output_is_independent_per_call() {
        let rooms = names(&["a", "b", "c"]);
        let links = pairs(&[("a", "c"), ("b", "c")]);
        assert_eq!(parents_of(&rooms, &links).unwrap(), parents_of(&rooms, &links).unwrap());
    }
}
