//! Proven absence of homomorphisms.
//!
//! A marked pair `a -> b` asserts that no homomorphism exists from `a` to
//! `b`. Unlike the partial order there is no path semantics here: negative
//! relations do not compose on their own. Derived negatives (chaining a
//! negative with positive reachability) live in the façade, which owns both
//! caches.

use indexmap::{IndexMap, IndexSet};

use homlat_common::GraphId;

#[derive(Debug, Clone, Default)]
pub(crate) struct NonRelationCache {
    excluded: IndexMap<GraphId, IndexSet<GraphId>>,
}

impl NonRelationCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that no homomorphism `from -> to` exists.
    pub(crate) fn mark(&mut self, from: GraphId, to: GraphId) {
        self.excluded.entry(from).or_default().insert(to);
    }

    pub(crate) fn is_marked(&self, from: &GraphId, to: &GraphId) -> bool {
        self.excluded
            .get(from)
            .is_some_and(|set| set.contains(to))
    }

    /// Targets `x` with `from -> x` excluded.
    pub(crate) fn excluded_targets(&self, from: &GraphId) -> impl Iterator<Item = &GraphId> {
        self.excluded.get(from).into_iter().flatten()
    }

    /// Sources `x` with `x -> to` excluded.
    pub(crate) fn excluded_sources<'a>(
        &'a self,
        to: &'a GraphId,
    ) -> impl Iterator<Item = &'a GraphId> {
        self.excluded
            .iter()
            .filter(move |(_, set)| set.contains(to))
            .map(|(from, _)| from)
    }

    /// Drop every entry touching `id`.
    pub(crate) fn remove(&mut self, id: &GraphId) {
        self.excluded.shift_remove(id);
        for set in self.excluded.values_mut() {
            set.shift_remove(id);
        }
    }

    /// `(from, [to...])` adjacency view for snapshots.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&GraphId, &IndexSet<GraphId>)> {
        self.excluded.iter().filter(|(_, set)| !set.is_empty())
    }
}
