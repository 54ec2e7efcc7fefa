//! A complete homomorphism found by the search.

use std::collections::BTreeMap;

use homlat_common::{Graph, NodeId};

/// Total mapping from source-graph nodes to target-graph nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    map: BTreeMap<NodeId, NodeId>,
}

impl Mapping {
    pub(crate) fn new(map: BTreeMap<NodeId, NodeId>) -> Self {
        Self { map }
    }

    /// Image of source node `u`, if `u` is in the domain.
    #[must_use]
    pub fn get(&self, u: NodeId) -> Option<NodeId> {
        self.map.get(&u).copied()
    }

    /// Number of mapped nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the domain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `(source, image)` pairs in ascending source order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.map.iter().map(|(&u, &v)| (u, v))
    }

    /// Soundness check: the domain covers every node of `g`, every image is
    /// a node of `h`, and every edge of `g` maps onto an edge of `h`
    /// (orientation respected for directed graphs).
    #[must_use]
    pub fn verify(&self, g: &Graph, h: &Graph) -> bool {
        if self.map.len() != g.node_count() {
            return false;
        }
        for (&u, &hu) in &self.map {
            if !g.contains_node(u) || !h.contains_node(hu) {
                return false;
            }
        }
        g.edges().iter().all(|&(u, v)| {
            match (self.map.get(&u), self.map.get(&v)) {
                (Some(&hu), Some(&hv)) => h.has_edge(hu, hv),
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(NodeId, NodeId)]) -> Mapping {
        Mapping::new(pairs.iter().copied().collect())
    }

    #[test]
    fn verify_accepts_fold_of_path_onto_edge() {
        // P3 folds onto K2 by collapsing the endpoints.
        let g = Graph::path(3);
        let h = Graph::complete(2);
        assert!(mapping(&[(0, 0), (1, 1), (2, 0)]).verify(&g, &h));
    }

    #[test]
    fn verify_rejects_broken_edge() {
        let g = Graph::path(3);
        let h = Graph::complete(2);
        assert!(!mapping(&[(0, 0), (1, 0), (2, 0)]).verify(&g, &h));
    }

    #[test]
    fn verify_rejects_partial_domain() {
        let g = Graph::path(3);
        let h = Graph::complete(2);
        assert!(!mapping(&[(0, 0), (1, 1)]).verify(&g, &h));
    }
}
