//! Directed graph over graph identifiers.
//!
//! Small adjacency structure shared by the partial order and the snapshot
//! loader. Iteration order is insertion order throughout, which keeps every
//! scan deterministic.

use indexmap::{IndexMap, IndexSet};

use homlat_common::GraphId;

#[derive(Debug, Clone, Default)]
pub(crate) struct RelationGraph {
    adjacency: IndexMap<GraphId, IndexSet<GraphId>>,
}

impl RelationGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, id: GraphId) {
        self.adjacency.entry(id).or_default();
    }

    pub(crate) fn contains_node(&self, id: &GraphId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub(crate) fn add_edge(&mut self, from: GraphId, to: GraphId) {
        self.add_node(to.clone());
        self.adjacency.entry(from).or_default().insert(to);
    }

    pub(crate) fn remove_edge(&mut self, from: &GraphId, to: &GraphId) -> bool {
        self.adjacency
            .get_mut(from)
            .is_some_and(|succ| succ.shift_remove(to))
    }

    /// Drop a node together with its incident edges.
    pub(crate) fn remove_node(&mut self, id: &GraphId) {
        self.adjacency.shift_remove(id);
        for succ in self.adjacency.values_mut() {
            succ.shift_remove(id);
        }
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &GraphId> {
        self.adjacency.keys()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn successors(&self, id: &GraphId) -> impl Iterator<Item = &GraphId> {
        self.adjacency.get(id).into_iter().flatten()
    }

    pub(crate) fn edges(&self) -> impl Iterator<Item = (&GraphId, &GraphId)> {
        self.adjacency
            .iter()
            .flat_map(|(from, succ)| succ.iter().map(move |to| (from, to)))
    }

    /// Directed reachability. A node reaches itself.
    pub(crate) fn has_path(&self, from: &GraphId, to: &GraphId) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        if from == to {
            return true;
        }
        self.search(from, to, None)
    }

    /// Reachability with one specific edge removed from consideration; used
    /// to decide whether that edge is redundant.
    pub(crate) fn has_path_avoiding(
        &self,
        from: &GraphId,
        to: &GraphId,
        skip: (&GraphId, &GraphId),
    ) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        self.search(from, to, Some(skip))
    }

    fn search(&self, from: &GraphId, to: &GraphId, skip: Option<(&GraphId, &GraphId)>) -> bool {
        let mut seen: IndexSet<&GraphId> = IndexSet::new();
        let mut stack: Vec<&GraphId> = vec![from];
        seen.insert(from);
        while let Some(current) = stack.pop() {
            for succ in self.successors(current) {
                if skip.is_some_and(|(su, sv)| su == current && sv == succ) {
                    continue;
                }
                if succ == to {
                    return true;
                }
                if seen.insert(succ) {
                    stack.push(succ);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> GraphId {
        GraphId::from(s)
    }

    #[test]
    fn path_follows_edges_transitively() {
        let mut g = RelationGraph::new();
        g.add_edge(id("a"), id("b"));
        g.add_edge(id("b"), id("c"));
        assert!(g.has_path(&id("a"), &id("c")));
        assert!(!g.has_path(&id("c"), &id("a")));
        assert!(g.has_path(&id("a"), &id("a")));
    }

    #[test]
    fn avoiding_the_only_edge_breaks_the_path() {
        let mut g = RelationGraph::new();
        g.add_edge(id("a"), id("b"));
        assert!(!g.has_path_avoiding(&id("a"), &id("b"), (&id("a"), &id("b"))));

        g.add_edge(id("a"), id("m"));
        g.add_edge(id("m"), id("b"));
        assert!(g.has_path_avoiding(&id("a"), &id("b"), (&id("a"), &id("b"))));
    }

    #[test]
    fn removing_a_node_drops_incident_edges() {
        let mut g = RelationGraph::new();
        g.add_edge(id("a"), id("b"));
        g.add_edge(id("b"), id("c"));
        g.remove_node(&id("b"));
        assert!(!g.contains_node(&id("b")));
        assert!(!g.has_path(&id("a"), &id("c")));
    }
}
