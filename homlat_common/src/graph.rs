//! Finite graph model.
//!
//! Graphs are immutable once constructed: the core only ever reads them.
//! The wire form is the JSON document `{"nodes": [...], "edges": [[u, v], ...]}`
//! with an optional `"directed"` flag (absent means undirected).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Node identifier within a single graph. Opaque and comparable; not
/// required to be contiguous.
pub type NodeId = u32;

/// An immutable finite graph with a directed or undirected edge relation.
///
/// Invariant: every edge endpoint is a member of the node set. Enforced at
/// construction and deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphDoc", into = "GraphDoc")]
pub struct Graph {
    directed: bool,
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    edge_set: HashSet<(NodeId, NodeId)>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Graph {
    /// Build a graph, validating that every edge endpoint is declared.
    pub fn new(
        directed: bool,
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, GraphError> {
        let node_set: BTreeSet<NodeId> = nodes.into_iter().collect();
        let raw_edges: Vec<(NodeId, NodeId)> = edges.into_iter().collect();

        for &(u, v) in &raw_edges {
            for end in [u, v] {
                if !node_set.contains(&end) {
                    return Err(GraphError::DanglingEndpoint {
                        from: u,
                        to: v,
                        missing: end,
                    });
                }
            }
        }

        let mut edge_set: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut edges = Vec::with_capacity(raw_edges.len());
        for (u, v) in raw_edges {
            let seen = if directed {
                edge_set.contains(&(u, v))
            } else {
                edge_set.contains(&(u, v)) || edge_set.contains(&(v, u))
            };
            if !seen {
                edge_set.insert((u, v));
                edges.push((u, v));
            }
        }

        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = node_set
            .iter()
            .map(|&nd| (nd, BTreeSet::new()))
            .collect();
        for &(u, v) in &edges {
            // Endpoints were validated above.
            adjacency.entry(u).or_default().insert(v);
            adjacency.entry(v).or_default().insert(u);
        }

        Ok(Self {
            directed,
            nodes: node_set.into_iter().collect(),
            edges,
            edge_set,
            adjacency,
        })
    }

    /// Undirected graph from an edge list plus any isolated nodes.
    pub fn undirected(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, GraphError> {
        Self::new(false, nodes, edges)
    }

    /// Whether the edge relation is directed.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node identifiers in ascending order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edges as declared (deduplicated).
    #[must_use]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Whether `nd` is in the node set.
    #[must_use]
    pub fn contains_node(&self, nd: NodeId) -> bool {
        self.adjacency.contains_key(&nd)
    }

    /// Edge membership. Symmetric for undirected graphs.
    #[must_use]
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        if self.directed {
            self.edge_set.contains(&(u, v))
        } else {
            self.edge_set.contains(&(u, v)) || self.edge_set.contains(&(v, u))
        }
    }

    /// Neighbors of `u` ignoring direction (the view the search heuristics
    /// score against).
    pub fn neighbors(&self, u: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&u).into_iter().flatten().copied()
    }

    /// Undirected degree of `u`.
    #[must_use]
    pub fn degree(&self, u: NodeId) -> usize {
        self.adjacency.get(&u).map_or(0, BTreeSet::len)
    }

    /// Whether the graph is connected under the undirected view. The empty
    /// graph counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.nodes.first() else {
            return true;
        };
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(nd) = stack.pop() {
            if seen.insert(nd) {
                stack.extend(self.neighbors(nd).filter(|n| !seen.contains(n)));
            }
        }
        seen.len() == self.nodes.len()
    }

    /// Path classification: connected, exactly two leaves, every other node
    /// of degree two, and tree-like edge count.
    #[must_use]
    pub fn is_path(&self) -> bool {
        if self.node_count() < 2 {
            return false;
        }
        let mut leaves = 0;
        for &nd in &self.nodes {
            match self.degree(nd) {
                1 => leaves += 1,
                2 => {}
                _ => return false,
            }
        }
        leaves == 2 && self.edge_count() + 1 == self.node_count() && self.is_connected()
    }

    /// Cycle classification: connected and every node of degree two.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.node_count() >= 3
            && self.nodes.iter().all(|&nd| self.degree(nd) == 2)
            && self.is_connected()
    }

    /// Complete-graph classification: every distinct pair adjacent.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.nodes
            .iter()
            .flat_map(|&u| self.nodes.iter().map(move |&v| (u, v)))
            .filter(|(u, v)| u != v)
            .all(|(u, v)| self.has_edge(u, v))
    }

    /// The path graph `P_n` on nodes `0..n`.
    #[must_use]
    pub fn path(n: u32) -> Self {
        let edges = (1..n).map(|i| (i - 1, i));
        Self::undirected(0..n, edges).expect("path endpoints are declared")
    }

    /// The cycle graph `C_n` on nodes `0..n`.
    #[must_use]
    pub fn cycle(n: u32) -> Self {
        let edges = (0..n).map(|i| (i, (i + 1) % n));
        Self::undirected(0..n, edges).expect("cycle endpoints are declared")
    }

    /// The complete graph `K_n` on nodes `0..n`.
    #[must_use]
    pub fn complete(n: u32) -> Self {
        let edges = (0..n).flat_map(|u| (u + 1..n).map(move |v| (u, v)));
        Self::undirected(0..n, edges).expect("complete-graph endpoints are declared")
    }

    /// `n` isolated nodes, no edges.
    #[must_use]
    pub fn edgeless(n: u32) -> Self {
        Self::undirected(0..n, []).expect("edgeless graphs have no endpoints")
    }
}

/// Wire form of a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphDoc {
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    #[serde(default, skip_serializing_if = "is_false")]
    directed: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<GraphDoc> for Graph {
    type Error = GraphError;

    fn try_from(doc: GraphDoc) -> Result<Self, Self::Error> {
        Self::new(doc.directed, doc.nodes, doc.edges)
    }
}

impl From<Graph> for GraphDoc {
    fn from(g: Graph) -> Self {
        Self {
            nodes: g.nodes,
            edges: g.edges,
            directed: g.directed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dangling_endpoint() {
        let err = Graph::undirected([0, 1], [(0, 2)]).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEndpoint {
                from: 0,
                to: 2,
                missing: 2
            }
        );
    }

    #[test]
    fn undirected_edges_are_symmetric() {
        let g = Graph::path(3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 0));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn directed_edges_are_oriented() {
        let g = Graph::new(true, [0, 1], [(0, 1)]).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let g = Graph::undirected([0, 1], [(0, 1), (1, 0), (0, 1)]).unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn family_classifiers() {
        assert!(Graph::path(4).is_path());
        assert!(!Graph::path(4).is_cycle());
        assert!(Graph::cycle(5).is_cycle());
        assert!(Graph::complete(4).is_complete());
        assert!(!Graph::cycle(4).is_complete());
        // K3 and C3 coincide
        assert!(Graph::cycle(3).is_complete());
    }

    #[test]
    fn serde_round_trip() {
        let g = Graph::cycle(4);
        let doc = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&doc).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn deserialization_validates_endpoints() {
        let doc = r#"{"nodes": [0, 1], "edges": [[0, 7]]}"#;
        assert!(serde_json::from_str::<Graph>(doc).is_err());
    }
}
