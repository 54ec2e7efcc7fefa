//! Graph store collaborator interface.
//!
//! Persistence formats, directory layouts, and download utilities live
//! outside the core; the lattice only needs `load` and `save` keyed by an
//! opaque identifier.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::graph::Graph;
use crate::id::GraphId;

/// Load/save access to persisted graphs.
pub trait GraphStore {
    /// Fetch the graph for `id`, or [`StoreError::NotFound`].
    fn load(&self, id: &GraphId) -> Result<Graph, StoreError>;

    /// Persist `graph` under `id`, replacing any previous version.
    fn save(&mut self, id: &GraphId, graph: &Graph) -> Result<(), StoreError>;
}

/// In-memory store used by tests and by embedders that already hold their
/// graphs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    graphs: HashMap<GraphId, Graph>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience insert for store setup.
    pub fn insert(&mut self, id: impl Into<GraphId>, graph: Graph) {
        self.graphs.insert(id.into(), graph);
    }

    /// Number of stored graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the store holds no graphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl GraphStore for MemoryStore {
    fn load(&self, id: &GraphId) -> Result<Graph, StoreError> {
        self.graphs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&mut self, id: &GraphId, graph: &Graph) -> Result<(), StoreError> {
        self.graphs.insert(id.clone(), graph.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.load(&GraphId::from("absent")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let g = Graph::cycle(3);
        store.save(&GraphId::from("c3"), &g).unwrap();
        assert_eq!(store.load(&GraphId::from("c3")).unwrap(), g);
    }
}
