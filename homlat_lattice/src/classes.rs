//! Equivalence classes of mutually homomorphic graphs.
//!
//! Every registered identifier resolves to a representative through a
//! union-find-style indirection; folding a graph into a class never rewrites
//! edges elsewhere, it only redirects the resolution.

use indexmap::{IndexMap, IndexSet};

use homlat_common::GraphId;

#[derive(Debug, Clone, Default)]
pub(crate) struct EquivalenceRegistry {
    /// Member to representative; representatives map to themselves.
    parent: IndexMap<GraphId, GraphId>,
    /// Representative to non-representative members.
    members: IndexMap<GraphId, IndexSet<GraphId>>,
}

impl EquivalenceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `id` as a fresh representative of its own singleton class.
    pub(crate) fn register(&mut self, id: GraphId) {
        self.parent.insert(id.clone(), id.clone());
        self.members.entry(id).or_default();
    }

    pub(crate) fn is_known(&self, id: &GraphId) -> bool {
        self.parent.contains_key(id)
    }

    pub(crate) fn is_representative(&self, id: &GraphId) -> bool {
        self.parent.get(id) == Some(id)
    }

    /// Representative of `id`'s class, if `id` is registered.
    pub(crate) fn resolve(&self, id: &GraphId) -> Option<&GraphId> {
        let mut current = self.parent.get(id)?;
        // The indirection is kept one level deep, but following the chain
        // costs nothing and tolerates folds of folds.
        loop {
            let next = self.parent.get(current)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }
    }

    /// Fold `member` (and any members it already carried) into `rep`'s class.
    pub(crate) fn fold(&mut self, member: &GraphId, rep: &GraphId) {
        self.parent.insert(member.clone(), rep.clone());
        let carried = self
            .members
            .shift_remove(member)
            .unwrap_or_default();
        let class = self.members.entry(rep.clone()).or_default();
        class.insert(member.clone());
        for m in carried {
            self.parent.insert(m.clone(), rep.clone());
            class.insert(m);
        }
    }

    pub(crate) fn representatives(&self) -> impl Iterator<Item = &GraphId> {
        self.members.keys()
    }

    pub(crate) fn members_of(&self, rep: &GraphId) -> impl Iterator<Item = &GraphId> {
        self.members.get(rep).into_iter().flatten()
    }

    /// Representative plus member count.
    pub(crate) fn class_size(&self, rep: &GraphId) -> usize {
        1 + self.members.get(rep).map_or(0, IndexSet::len)
    }
}
