//! Persisted lattice snapshot.
//!
//! Deserializing a snapshot and re-serializing it without intervening
//! mutation reproduces an equivalent structure; edge lists may differ only
//! by whether transitive reduction had been applied before saving.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use homlat_common::GraphId;

use crate::error::SnapshotError;

/// Wire form of the lattice state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Representative identifiers (the order's node set).
    pub nodes: Vec<GraphId>,
    /// Proven positive relations between representatives.
    pub edges: Vec<(GraphId, GraphId)>,
    /// Proven negative relations, as an adjacency map.
    pub nonedges: BTreeMap<GraphId, Vec<GraphId>>,
    /// The representative set, stated explicitly.
    pub cores: Vec<GraphId>,
    /// Non-representative members per representative.
    pub classes: BTreeMap<GraphId, Vec<GraphId>>,
}

impl Snapshot {
    /// Shape validation, run before any lattice is constructed from the
    /// document.
    pub(crate) fn validate(&self) -> Result<(), SnapshotError> {
        let nodes: BTreeSet<&GraphId> = self.nodes.iter().collect();
        let cores: BTreeSet<&GraphId> = self.cores.iter().collect();

        if nodes != cores {
            return Err(SnapshotError::Malformed(
                "nodes and cores disagree on the representative set".into(),
            ));
        }
        for (from, to) in &self.edges {
            for end in [from, to] {
                if !nodes.contains(end) {
                    return Err(SnapshotError::Malformed(format!(
                        "edge ({from}, {to}) references unknown representative {end}"
                    )));
                }
            }
        }
        for (from, targets) in &self.nonedges {
            if !nodes.contains(from) {
                return Err(SnapshotError::Malformed(format!(
                    "nonedge source {from} is not a representative"
                )));
            }
            for to in targets {
                if !nodes.contains(to) {
                    return Err(SnapshotError::Malformed(format!(
                        "nonedge target {to} of {from} is not a representative"
                    )));
                }
            }
        }
        let mut seen_members: BTreeSet<&GraphId> = BTreeSet::new();
        for (rep, members) in &self.classes {
            if !cores.contains(rep) {
                return Err(SnapshotError::Malformed(format!(
                    "class representative {rep} is not in the core set"
                )));
            }
            for member in members {
                if nodes.contains(member) {
                    return Err(SnapshotError::Malformed(format!(
                        "class member {member} is still listed as a representative"
                    )));
                }
                if !seen_members.insert(member) {
                    return Err(SnapshotError::Malformed(format!(
                        "class member {member} belongs to more than one class"
                    )));
                }
            }
        }
        Ok(())
    }
}
