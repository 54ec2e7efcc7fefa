//! Configuration for the search engine and the lattice.
//!
//! Two small structs with semantic defaults. The defaults reproduce the
//! tuned behavior of the search heuristics; embedders mostly construct
//! `::default()` and override a field or two.

use std::time::Duration;

/// Parameters of the backtracking homomorphism search.
///
/// The two weight pairs drive the variable- and value-ordering heuristics:
/// - node choice: `assigned_neighbor_weight * |assigned neighbors| +
///   frontier_neighbor_weight * |unassigned neighbors|`, ties broken by the
///   per-node failure counter (fail-first);
/// - candidate order: `image_neighbor_weight * |neighbors inside the partial
///   image| + off_image_neighbor_weight * |neighbors outside it|`, minus the
///   candidate's prune counter.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Weight of a source node's already-assigned neighbors when choosing
    /// the next node to bind.
    pub assigned_neighbor_weight: u64,
    /// Weight of a source node's still-unassigned neighbors.
    pub frontier_neighbor_weight: u64,
    /// Weight of a candidate's neighbors that already lie in the partial
    /// image.
    pub image_neighbor_weight: u64,
    /// Weight of a candidate's neighbors outside the partial image.
    pub off_image_neighbor_weight: u64,
    /// Candidate lists are re-ordered only while
    /// `depth < node_count / reorder_depth_divisor`; deeper reordering costs
    /// more than it prunes.
    pub reorder_depth_divisor: usize,
    /// Optional wall-clock budget. When exceeded the search stops with an
    /// inconclusive outcome instead of a negative answer.
    pub budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            assigned_neighbor_weight: 100,
            frontier_neighbor_weight: 50,
            image_neighbor_weight: 100,
            off_image_neighbor_weight: 10,
            reorder_depth_divisor: 2,
            budget: None,
        }
    }
}

/// Policy knobs of the lattice.
#[derive(Debug, Clone)]
pub struct LatticeConfig {
    /// Graphs with at most this many nodes always stay their own
    /// representative, even when homomorphically equivalent to another;
    /// small graphs are kept individually distinguishable.
    pub distinct_size_threshold: usize,
    /// Capacity of the bounded loaded-graph cache.
    pub graph_cache_capacity: usize,
    /// Recursion bound of the pivot search used when neither queried graph
    /// is registered.
    pub max_pivot_depth: usize,
    /// Search parameters for solver calls issued by the lattice.
    pub search: SearchConfig,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            distinct_size_threshold: 2,
            graph_cache_capacity: 64,
            max_pivot_depth: 4,
            search: SearchConfig::default(),
        }
    }
}
