//! The partial order over representatives.
//!
//! An edge `u -> v` records a proven homomorphism between representatives.
//! Reachability is the authoritative positive relation; direct edges are an
//! implementation detail that transitive reduction is free to thin out.

use tracing::debug;

use homlat_common::GraphId;

use crate::relation::RelationGraph;

#[derive(Debug, Clone, Default)]
pub(crate) struct PartialOrder {
    graph: RelationGraph,
}

impl PartialOrder {
    pub(crate) fn new() -> Self {
        Self {
            graph: RelationGraph::new(),
        }
    }

    pub(crate) fn add_representative(&mut self, id: GraphId) {
        self.graph.add_node(id);
    }

    /// Record a proven relation `from -> to`.
    pub(crate) fn relate(&mut self, from: GraphId, to: GraphId) {
        self.graph.add_edge(from, to);
    }

    /// Positive relation: reachability, not just direct edges.
    pub(crate) fn is_reachable(&self, from: &GraphId, to: &GraphId) -> bool {
        self.graph.has_path(from, to)
    }

    /// Drop a representative and its incident edges (used when it folds into
    /// an equivalence class; its relations are implied through the class
    /// representative from then on).
    pub(crate) fn remove(&mut self, id: &GraphId) {
        self.graph.remove_node(id);
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &GraphId> {
        self.graph.nodes()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = (&GraphId, &GraphId)> {
        self.graph.edges()
    }

    /// Remove every edge whose removal leaves its endpoints connected by an
    /// alternate directed path. Computed over the full graph, once per batch
    /// of insertions; applying it twice removes nothing the second time.
    pub(crate) fn transitive_reduction(&mut self) -> usize {
        let edges: Vec<(GraphId, GraphId)> = self
            .graph
            .edges()
            .map(|(u, v)| (u.clone(), v.clone()))
            .collect();
        let mut removed = 0;
        for (u, v) in edges {
            if self.graph.has_path_avoiding(&u, &v, (&u, &v)) {
                self.graph.remove_edge(&u, &v);
                removed += 1;
                debug!(from = %u, to = %v, "dropped redundant order edge");
            }
        }
        removed
    }
}
