//! The lattice façade.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tracing::{debug, info};

use homlat_common::{GraphId, GraphStore, LatticeConfig};
use homlat_solver::{Outcome, Solver};

use crate::cache::GraphCache;
use crate::classes::EquivalenceRegistry;
use crate::error::LatticeError;
use crate::nonrelation::NonRelationCache;
use crate::order::PartialOrder;
use crate::selector::RepresentativeSelector;
use crate::snapshot::Snapshot;

/// Tri-state answer of [`Lattice::establish_homomorphism`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// A homomorphism exists.
    Holds,
    /// No homomorphism exists.
    Absent,
    /// Ill-posed (an endpoint is not currently a representative) or
    /// undecided within budget.
    Unknown,
}

/// Oracle-call accounting. The memoization guarantee is observable here:
/// re-querying decided pairs must not grow `solver_calls`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatticeStats {
    /// Number of backtracking searches actually run.
    pub solver_calls: u64,
    /// Queries answered from order reachability.
    pub relation_hits: u64,
    /// Queries answered from the non-relation cache (direct or derived).
    pub nonrelation_hits: u64,
}

/// Incrementally maintained homomorphism order over stored graphs.
///
/// All mutation goes through [`Lattice::add_object`] and
/// [`Lattice::reduce`]; queries never change the relation structure beyond
/// memoizing solver verdicts.
#[derive(Debug)]
pub struct Lattice<S: GraphStore> {
    store: S,
    config: LatticeConfig,
    order: PartialOrder,
    nonrel: NonRelationCache,
    registry: EquivalenceRegistry,
    selector: RepresentativeSelector,
    cache: GraphCache,
    stats: LatticeStats,
}

impl<S: GraphStore> Lattice<S> {
    /// Empty lattice over `store`.
    pub fn new(store: S, config: LatticeConfig) -> Self {
        let selector = RepresentativeSelector::new(config.distinct_size_threshold);
        let cache = GraphCache::new(config.graph_cache_capacity);
        Self {
            store,
            config,
            order: PartialOrder::new(),
            nonrel: NonRelationCache::new(),
            registry: EquivalenceRegistry::new(),
            selector,
            cache,
            stats: LatticeStats::default(),
        }
    }

    /// Restore a lattice from a persisted snapshot. Validation failures are
    /// reported here, before any lattice exists.
    pub fn from_snapshot(
        snapshot: Snapshot,
        store: S,
        config: LatticeConfig,
    ) -> Result<Self, LatticeError> {
        snapshot.validate()?;
        let mut lattice = Self::new(store, config);
        for id in &snapshot.nodes {
            lattice.registry.register(id.clone());
            lattice.order.add_representative(id.clone());
        }
        for (from, to) in &snapshot.edges {
            lattice.order.relate(from.clone(), to.clone());
        }
        for (rep, members) in &snapshot.classes {
            for member in members {
                lattice.registry.register(member.clone());
                lattice.registry.fold(member, rep);
            }
        }
        for (from, targets) in &snapshot.nonedges {
            for to in targets {
                if lattice.order.is_reachable(from, to) {
                    return Err(LatticeError::InvariantViolation {
                        from: from.clone(),
                        to: to.clone(),
                        cache: "snapshot",
                        detail: "pair is order-reachable but listed as a nonedge".into(),
                    });
                }
                lattice.nonrel.mark(from.clone(), to.clone());
            }
        }
        info!(
            representatives = lattice.order.node_count(),
            "restored lattice from snapshot"
        );
        Ok(lattice)
    }

    /// Shared access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store, for embedders that add graphs
    /// between insertions.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Oracle-call counters.
    #[must_use]
    pub fn stats(&self) -> LatticeStats {
        self.stats
    }

    /// Current representative identifiers, in registration order.
    pub fn representatives(&self) -> impl Iterator<Item = &GraphId> {
        self.registry.representatives()
    }

    /// Representative of `id`'s class, if `id` has been inserted.
    #[must_use]
    pub fn representative_of(&self, id: &GraphId) -> Option<&GraphId> {
        self.registry.resolve(id)
    }

    /// Non-representative members of `rep`'s class.
    pub fn class_members(&self, rep: &GraphId) -> impl Iterator<Item = &GraphId> {
        self.registry.members_of(rep)
    }

    /// Whether `id` was inserted (as representative or folded member).
    #[must_use]
    pub fn contains(&self, id: &GraphId) -> bool {
        self.registry.is_known(id)
    }

    /// Insert a stored graph into the order.
    ///
    /// Re-inserting a known identifier is a no-op. A graph that proves
    /// mutually homomorphic with an existing representative (and is large
    /// enough not to be pinned by the distinct-size policy) folds into that
    /// class and the scan stops: relations to the remaining representatives
    /// are implied through the class.
    pub fn add_object(&mut self, id: &GraphId) -> Result<(), LatticeError> {
        if self.registry.is_known(id) {
            debug!(%id, "already registered");
            return Ok(());
        }
        // Load before touching any structure so a missing graph aborts with
        // prior state unchanged.
        let graph = self.cache.fetch(&self.store, id)?;
        self.registry.register(id.clone());
        self.order.add_representative(id.clone());
        info!(%id, nodes = graph.node_count(), "registered object");

        let mut others: Vec<GraphId> = self
            .registry
            .representatives()
            .filter(|r| *r != id)
            .cloned()
            .collect();
        // Larger, more informative classes first.
        others.sort_by_key(|r| Reverse(self.registry.class_size(r)));

        for other in others {
            let forward = self.establish_homomorphism(id, &other)?;
            let backward = self.establish_homomorphism(&other, id)?;
            if self.selector.may_fold(
                graph.node_count(),
                forward == Relation::Holds,
                backward == Relation::Holds,
            ) {
                self.fold(id, &other);
                break;
            }
        }
        // A graph that survives the scan as its own representative is either
        // pinned by the size policy or forced by its local relations.
        debug_assert!(
            !self.registry.is_representative(id)
                || self.selector.always_distinct(graph.node_count())
                || self.selector.locally_required(id, &self.order)
        );
        Ok(())
    }

    /// Decide the relation between two current representatives, consulting
    /// both caches before the solver and memoizing any fresh verdict.
    ///
    /// Returns [`Relation::Unknown`] when either endpoint is not a
    /// representative; callers resolve identifiers first.
    pub fn establish_homomorphism(
        &mut self,
        a: &GraphId,
        b: &GraphId,
    ) -> Result<Relation, LatticeError> {
        if !self.registry.is_representative(a) || !self.registry.is_representative(b) {
            return Ok(Relation::Unknown);
        }
        if a == b || self.order.is_reachable(a, b) {
            self.stats.relation_hits += 1;
            return Ok(Relation::Holds);
        }
        if self.unrelated_between_reps(a, b) {
            self.stats.nonrelation_hits += 1;
            return Ok(Relation::Absent);
        }
        let related = self.solve(a, b)?;
        self.memoize(a, b, related)?;
        Ok(if related {
            Relation::Holds
        } else {
            Relation::Absent
        })
    }

    /// Record a decided relation, resolving both identifiers to their
    /// representatives. Re-recording a decided pair is a no-op; recording a
    /// contradiction is fatal.
    pub fn memoize(
        &mut self,
        a: &GraphId,
        b: &GraphId,
        related: bool,
    ) -> Result<(), LatticeError> {
        let (ra, rb) = match (
            self.registry.resolve(a).cloned(),
            self.registry.resolve(b).cloned(),
        ) {
            (Some(ra), Some(rb)) => (ra, rb),
            _ => {
                return Err(LatticeError::InvariantViolation {
                    from: a.clone(),
                    to: b.clone(),
                    cache: "equivalence registry",
                    detail: "memoizing a relation for an unregistered identifier".into(),
                });
            }
        };
        if related {
            if self.unrelated_between_reps(&ra, &rb) {
                return Err(LatticeError::InvariantViolation {
                    from: ra,
                    to: rb,
                    cache: "non-relation cache",
                    detail: "recording a positive relation for a pair proven unrelated".into(),
                });
            }
            if ra != rb && !self.order.is_reachable(&ra, &rb) {
                self.order.relate(ra, rb);
            }
        } else {
            if ra == rb || self.order.is_reachable(&ra, &rb) {
                return Err(LatticeError::InvariantViolation {
                    from: ra,
                    to: rb,
                    cache: "partial order",
                    detail: "recording a negative relation for a pair proven related".into(),
                });
            }
            if !self.unrelated_between_reps(&ra, &rb) {
                self.nonrel.mark(ra, rb);
            }
        }
        Ok(())
    }

    /// Whether `a -> b` is positively decided (after representative
    /// resolution).
    #[must_use]
    pub fn is_known_related(&self, a: &GraphId, b: &GraphId) -> bool {
        match (self.registry.resolve(a), self.registry.resolve(b)) {
            (Some(ra), Some(rb)) => ra == rb || self.order.is_reachable(ra, rb),
            _ => false,
        }
    }

    /// Whether `a -> b` is negatively decided: a direct non-relation edge,
    /// or derived by chaining (`a` excludes some `x` that `b` reaches).
    #[must_use]
    pub fn is_known_unrelated(&self, a: &GraphId, b: &GraphId) -> bool {
        match (self.registry.resolve(a), self.registry.resolve(b)) {
            (Some(ra), Some(rb)) => ra != rb && self.unrelated_between_reps(ra, rb),
            _ => false,
        }
    }

    /// Top-level existence query; works for registered and unregistered
    /// identifiers alike.
    pub fn is_homomorphic(&mut self, g: &GraphId, h: &GraphId) -> Result<bool, LatticeError> {
        if g == h {
            return Ok(true);
        }
        let rg = self.registry.resolve(g).cloned();
        let rh = self.registry.resolve(h).cloned();
        match (rg, rh) {
            (Some(ra), Some(rb)) => {
                if ra == rb {
                    return Ok(true);
                }
                match self.establish_homomorphism(&ra, &rb)? {
                    Relation::Holds => Ok(true),
                    Relation::Absent => Ok(false),
                    Relation::Unknown => self.solve(&ra, &rb),
                }
            }
            (Some(ra), None) => self.query_from_known(&ra, h),
            (None, Some(rb)) => self.query_into_known(g, &rb),
            (None, None) => self.query_unregistered(g, h),
        }
    }

    /// Batch transitive reduction of the representative order. Returns the
    /// number of redundant edges removed.
    pub fn reduce(&mut self) -> usize {
        let removed = self.order.transitive_reduction();
        info!(removed, "transitive reduction complete");
        removed
    }

    /// Current state as a persistable document, deterministically ordered.
    #[must_use]
    pub fn export_snapshot(&self) -> Snapshot {
        let mut nodes: Vec<GraphId> = self.order.nodes().cloned().collect();
        nodes.sort();
        let mut edges: Vec<(GraphId, GraphId)> = self
            .order
            .edges()
            .map(|(u, v)| (u.clone(), v.clone()))
            .collect();
        edges.sort();
        let mut nonedges: BTreeMap<GraphId, Vec<GraphId>> = BTreeMap::new();
        for (from, targets) in self.nonrel.entries() {
            let mut sorted: Vec<GraphId> = targets.iter().cloned().collect();
            sorted.sort();
            nonedges.insert(from.clone(), sorted);
        }
        let mut cores: Vec<GraphId> = self.registry.representatives().cloned().collect();
        cores.sort();
        let mut classes: BTreeMap<GraphId, Vec<GraphId>> = BTreeMap::new();
        for rep in self.registry.representatives() {
            let mut members: Vec<GraphId> = self.registry.members_of(rep).cloned().collect();
            if members.is_empty() {
                continue;
            }
            members.sort();
            classes.insert(rep.clone(), members);
        }
        Snapshot {
            nodes,
            edges,
            nonedges,
            cores,
            classes,
        }
    }

    /// Direct + derived negative relation between two representatives.
    fn unrelated_between_reps(&self, a: &GraphId, b: &GraphId) -> bool {
        if self.nonrel.is_marked(a, b) {
            return true;
        }
        // a cannot reach x; if b reaches x, then a -> b would compose into
        // the excluded a -> x.
        self.nonrel
            .excluded_targets(a)
            .any(|x| self.order.is_reachable(b, x))
    }

    /// One ground-truth solver call, cache-loaded graphs on both sides.
    fn solve(&mut self, from: &GraphId, to: &GraphId) -> Result<bool, LatticeError> {
        let g = self.cache.fetch(&self.store, from)?;
        let h = self.cache.fetch(&self.store, to)?;
        self.stats.solver_calls += 1;
        debug!(%from, %to, "invoking solver");
        match Solver::new(g.as_ref(), h.as_ref(), &self.config.search).find_one() {
            Outcome::Found(_) => Ok(true),
            Outcome::Exhausted => Ok(false),
            Outcome::Inconclusive => Err(LatticeError::Inconclusive {
                from: from.clone(),
                to: to.clone(),
            }),
        }
    }

    /// Known source representative, unregistered target: try to refute
    /// through small negative-cache witnesses before the direct call.
    fn query_from_known(&mut self, rep: &GraphId, target: &GraphId) -> Result<bool, LatticeError> {
        let target_graph = self.cache.fetch(&self.store, target)?;
        let witnesses: Vec<GraphId> = self.nonrel.excluded_targets(rep).cloned().collect();
        for x in witnesses {
            let witness_graph = self.cache.fetch(&self.store, &x)?;
            if witness_graph.node_count() > target_graph.node_count() {
                continue;
            }
            // rep cannot reach x; if target maps into x, rep -> target would
            // compose into the excluded rep -> x.
            if self.solve(target, &x)? {
                debug!(%rep, %target, witness = %x, "refuted via negative-cache witness");
                return Ok(false);
            }
        }
        self.solve(rep, target)
    }

    /// Unregistered source, known target representative: the mirror
    /// refutation through witnesses excluded from reaching the target.
    fn query_into_known(&mut self, source: &GraphId, rep: &GraphId) -> Result<bool, LatticeError> {
        let source_graph = self.cache.fetch(&self.store, source)?;
        let witnesses: Vec<GraphId> = self.nonrel.excluded_sources(rep).cloned().collect();
        for x in witnesses {
            let witness_graph = self.cache.fetch(&self.store, &x)?;
            if witness_graph.node_count() > source_graph.node_count() {
                continue;
            }
            if self.solve(&x, source)? {
                debug!(%source, %rep, witness = %x, "refuted via negative-cache witness");
                return Ok(false);
            }
        }
        self.solve(source, rep)
    }

    /// Neither endpoint registered: opportunistic pivot search through small
    /// representatives, bounded by `max_pivot_depth` attempts, then a direct
    /// call.
    fn query_unregistered(&mut self, source: &GraphId, target: &GraphId) -> Result<bool, LatticeError> {
        let source_graph = self.cache.fetch(&self.store, source)?;
        let mut pivots: Vec<GraphId> = self.registry.representatives().cloned().collect();
        pivots.sort_by_key(|r| Reverse(self.registry.class_size(r)));

        let mut attempts = 0usize;
        for pivot in pivots {
            if attempts >= self.config.max_pivot_depth {
                break;
            }
            let pivot_graph = self.cache.fetch(&self.store, &pivot)?;
            if pivot_graph.node_count() > source_graph.node_count() {
                continue;
            }
            attempts += 1;
            if self.solve(source, &pivot)? && self.query_from_known(&pivot, target)? {
                debug!(%source, %target, %pivot, "answered through pivot");
                return Ok(true);
            }
        }
        self.solve(source, target)
    }

    fn fold(&mut self, id: &GraphId, rep: &GraphId) {
        info!(member = %id, representative = %rep, "folding into equivalence class");
        self.order.remove(id);
        self.nonrel.remove(id);
        self.registry.fold(id, rep);
        self.cache.evict(id);
    }
}
