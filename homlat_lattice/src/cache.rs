//! Bounded cache of loaded graphs.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::trace;

use homlat_common::{Graph, GraphId, GraphStore, StoreError};

/// LRU-bounded `GraphId -> Graph` cache in front of the store, scoped to
/// current representatives: folded identifiers are evicted eagerly.
#[derive(Debug)]
pub(crate) struct GraphCache {
    cache: LruCache<GraphId, Arc<Graph>>,
}

impl GraphCache {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least one");
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Cached graph for `id`, loading through `store` on a miss.
    pub(crate) fn fetch<S: GraphStore>(
        &mut self,
        store: &S,
        id: &GraphId,
    ) -> Result<Arc<Graph>, StoreError> {
        if let Some(graph) = self.cache.get(id) {
            trace!(%id, "graph cache hit");
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(store.load(id)?);
        self.cache.put(id.clone(), Arc::clone(&graph));
        trace!(%id, resident = self.len(), "graph cache fill");
        Ok(graph)
    }

    pub(crate) fn evict(&mut self, id: &GraphId) {
        self.cache.pop(id);
    }

    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homlat_common::MemoryStore;

    #[test]
    fn capacity_bounds_resident_graphs() {
        let mut store = MemoryStore::new();
        for i in 0..5u32 {
            store.insert(format!("g{i}"), Graph::path(3));
        }
        let mut cache = GraphCache::new(2);
        for i in 0..5u32 {
            cache
                .fetch(&store, &GraphId::from(format!("g{i}")))
                .unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn eviction_forces_a_reload() {
        let mut store = MemoryStore::new();
        store.insert("g", Graph::cycle(4));
        let mut cache = GraphCache::new(4);
        cache.fetch(&store, &GraphId::from("g")).unwrap();
        cache.evict(&GraphId::from("g"));
        assert_eq!(cache.len(), 0);
        assert!(cache.fetch(&store, &GraphId::from("g")).is_ok());
    }
}
