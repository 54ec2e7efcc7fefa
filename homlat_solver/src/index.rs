//! Positional view of a graph for the search loop.
//!
//! The search works over dense positions `0..n` rather than raw node
//! identifiers; the index owns the position <-> identifier translation and a
//! prebuilt undirected adjacency table.

use std::collections::HashMap;

use homlat_common::{Graph, NodeId};

pub(crate) struct GraphIndex<'g> {
    graph: &'g Graph,
    ids: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl<'g> GraphIndex<'g> {
    pub(crate) fn build(graph: &'g Graph) -> Self {
        let ids: Vec<NodeId> = graph.nodes().to_vec();
        let positions: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(i, &nd)| (nd, i)).collect();
        let neighbors: Vec<Vec<usize>> = ids
            .iter()
            .map(|&nd| graph.neighbors(nd).map(|m| positions[&m]).collect())
            .collect();
        Self {
            graph,
            ids,
            positions,
            neighbors,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn id(&self, pos: usize) -> NodeId {
        self.ids[pos]
    }

    pub(crate) fn position(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Undirected neighbor positions of `pos`.
    pub(crate) fn neighbors(&self, pos: usize) -> &[usize] {
        &self.neighbors[pos]
    }

    pub(crate) fn degree(&self, pos: usize) -> usize {
        self.neighbors[pos].len()
    }

    /// Directed-aware edge test on positions.
    pub(crate) fn adjacent(&self, from: usize, to: usize) -> bool {
        self.graph.has_edge(self.ids[from], self.ids[to])
    }

    pub(crate) fn graph(&self) -> &'g Graph {
        self.graph
    }
}
