//! The FORWARD/BACKTRACK search engine.

use std::collections::BTreeMap;
use std::time::Instant;

use homlat_common::{Graph, NodeId, SearchConfig};
use tracing::{debug, trace};

use crate::heuristics::{self, SearchStats};
use crate::index::GraphIndex;
use crate::mapping::Mapping;
use crate::state::{Action, SearchState};

/// Result of one existence query.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A valid homomorphism.
    Found(Mapping),
    /// The search space is exhausted: no homomorphism exists. This is the
    /// defined negative answer, not a failure.
    Exhausted,
    /// The search budget ran out before the space was exhausted; the
    /// question is undecided.
    Inconclusive,
}

impl Outcome {
    /// The mapping, when one was found.
    #[must_use]
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Self::Found(m) => Some(m),
            _ => None,
        }
    }

    /// Whether a homomorphism was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Summary of an enumeration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumeration {
    /// Number of distinct solutions visited.
    pub found: u64,
    /// False when the run stopped on the search budget instead of
    /// exhausting the space.
    pub complete: bool,
}

/// Depth-first backtracking search for homomorphisms `source -> target`.
///
/// A solver is a single-query object: heuristic counters accumulate across
/// its lifetime (repeated [`Solver::find_one`] calls resume the search and
/// yield further solutions) and are discarded with it.
pub struct Solver<'g, 'h, 'cfg> {
    source: GraphIndex<'g>,
    target: GraphIndex<'h>,
    config: &'cfg SearchConfig,
    state: SearchState,
    candidates: Vec<Vec<usize>>,
    stats: SearchStats,
    started: Instant,
}

enum Run {
    Solution,
    Exhausted,
    OverBudget,
}

impl<'g, 'h, 'cfg> Solver<'g, 'h, 'cfg> {
    /// Prepare a search from `source` into `target`.
    pub fn new(source: &'g Graph, target: &'h Graph, config: &'cfg SearchConfig) -> Self {
        let source_index = GraphIndex::build(source);
        let target_index = GraphIndex::build(target);
        let n = source_index.len();
        let m = target_index.len();

        // Initial candidate lists: the target nodes rotated by the source
        // position, so equal-scoring branches diverge between nodes.
        let candidates = (0..n)
            .map(|pos| {
                let mut list: Vec<usize> = (0..m).collect();
                if m > 0 {
                    list.rotate_right(pos % m);
                }
                list
            })
            .collect();

        debug!(
            source_nodes = n,
            target_nodes = m,
            "prepared homomorphism search"
        );

        Self {
            source: source_index,
            target: target_index,
            config,
            state: SearchState::new(n),
            candidates,
            stats: SearchStats::new(n, m),
            started: Instant::now(),
        }
    }

    /// Search counters of this query.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Run until the next valid assignment, exhaustion, or budget expiry.
    ///
    /// The first call answers the existence question; further calls
    /// enumerate the remaining solutions.
    pub fn find_one(&mut self) -> Outcome {
        match self.run() {
            Run::Solution => {
                let mapping = self.extract_mapping();
                debug!(
                    steps = self.stats.steps,
                    backtracks = self.stats.backtracks,
                    "homomorphism found"
                );
                // Step back into the assignment so the next call continues
                // the enumeration.
                self.state.retreat();
                Outcome::Found(mapping)
            }
            Run::Exhausted => {
                debug!(
                    steps = self.stats.steps,
                    backtracks = self.stats.backtracks,
                    "search space exhausted"
                );
                Outcome::Exhausted
            }
            Run::OverBudget => {
                debug!(steps = self.stats.steps, "search budget exceeded");
                Outcome::Inconclusive
            }
        }
    }

    /// Visit every homomorphism. Used for diagnostics and counting; the
    /// lattice only ever needs existence.
    pub fn enumerate(&mut self, mut visit: impl FnMut(&Mapping)) -> Enumeration {
        let mut found = 0;
        loop {
            match self.find_one() {
                Outcome::Found(m) => {
                    found += 1;
                    visit(&m);
                }
                Outcome::Exhausted => {
                    return Enumeration {
                        found,
                        complete: true,
                    };
                }
                Outcome::Inconclusive => {
                    return Enumeration {
                        found,
                        complete: false,
                    };
                }
            }
        }
    }

    /// Count all homomorphisms.
    pub fn count_all(&mut self) -> Enumeration {
        self.enumerate(|_| {})
    }

    fn run(&mut self) -> Run {
        let n = self.source.len();
        loop {
            while !self.state.exhausted() && (self.state.depth as usize) < n {
                self.stats.steps += 1;
                if self.over_budget() {
                    return Run::OverBudget;
                }
                if self.state.action == Action::Forward {
                    let depth = self.state.depth as usize;
                    let next =
                        heuristics::choose_next_node(&self.source, &self.state, &self.stats, self.config);
                    self.state.order[depth] = next;
                    if depth < n / self.config.reorder_depth_divisor.max(1) {
                        heuristics::order_candidates(
                            &self.target,
                            &self.state,
                            &self.stats,
                            self.config,
                            &mut self.candidates[next],
                        );
                    }
                }
                let pos = self.state.current();
                match self.next_consistent(pos) {
                    Some(idx) => {
                        let hpos = self.candidates[pos][idx];
                        trace!(depth = self.state.depth, source = pos, image = hpos, "bind");
                        self.state.bind(idx, hpos);
                    }
                    None => {
                        trace!(depth = self.state.depth, source = pos, "candidates exhausted");
                        self.stats.failures[pos] += 1;
                        self.stats.backtracks += 1;
                        self.state.unbind();
                    }
                }
            }
            if self.state.exhausted() {
                return Run::Exhausted;
            }
            // Depth reached the node count: a full assignment. The per-step
            // checks make it consistent; the global edge check is the final
            // word.
            if self.is_valid_solution() {
                return Run::Solution;
            }
            self.state.retreat();
        }
    }

    /// Advance the current node's choice index to its next consistent
    /// candidate, bumping prune counters on every rejection.
    fn next_consistent(&mut self, pos: usize) -> Option<usize> {
        let depth = self.state.depth.max(0) as usize;
        let mut idx = self.state.choice[pos].map_or(0, |c| c + 1);
        while idx < self.candidates[pos].len() {
            let cand = self.candidates[pos][idx];
            if self.consistent(pos, cand, depth) {
                return Some(idx);
            }
            self.stats.prunes[cand] += 1;
            idx += 1;
        }
        None
    }

    /// Would mapping `pos -> cand` preserve every edge into the already
    /// assigned part of the graph?
    fn consistent(&self, pos: usize, cand: usize, depth: usize) -> bool {
        if self.source.adjacent(pos, pos) && !self.target.adjacent(cand, cand) {
            return false;
        }
        for d in 0..depth {
            let other = self.state.order[d];
            let Some(img) = self.state.image[other] else {
                continue;
            };
            if self.source.adjacent(pos, other) && !self.target.adjacent(cand, img) {
                return false;
            }
            if self.source.adjacent(other, pos) && !self.target.adjacent(img, cand) {
                return false;
            }
        }
        true
    }

    fn is_valid_solution(&self) -> bool {
        self.source.graph().edges().iter().all(|&(u, v)| {
            let (Some(up), Some(vp)) = (self.source.position(u), self.source.position(v)) else {
                return false;
            };
            match (self.state.image[up], self.state.image[vp]) {
                (Some(hu), Some(hv)) => self.target.adjacent(hu, hv),
                _ => false,
            }
        })
    }

    fn extract_mapping(&self) -> Mapping {
        let map: BTreeMap<NodeId, NodeId> = (0..self.source.len())
            .filter_map(|p| {
                self.state.image[p]
                    .map(|h| (self.source.id(p), self.target.id(h)))
            })
            .collect();
        Mapping::new(map)
    }

    fn over_budget(&self) -> bool {
        self.config
            .budget
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }
}

/// One-shot existence query with the given configuration.
pub fn find_homomorphism(source: &Graph, target: &Graph, config: &SearchConfig) -> Outcome {
    Solver::new(source, target, config).find_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SearchConfig {
        SearchConfig::default()
    }

    fn exists(g: &Graph, h: &Graph) -> bool {
        find_homomorphism(g, h, &cfg()).is_found()
    }

    #[test]
    fn triangle_and_k3_map_both_ways() {
        let c3 = Graph::cycle(3);
        let k3 = Graph::complete(3);
        assert!(exists(&c3, &k3));
        assert!(exists(&k3, &c3));
    }

    #[test]
    fn path_folds_onto_edge() {
        assert!(exists(&Graph::path(3), &Graph::complete(2)));
    }

    #[test]
    fn edge_needs_an_edge_in_the_target() {
        assert!(!exists(&Graph::complete(2), &Graph::edgeless(3)));
    }

    #[test]
    fn odd_cycle_does_not_two_color() {
        assert!(!exists(&Graph::cycle(5), &Graph::complete(2)));
        assert!(exists(&Graph::cycle(4), &Graph::complete(2)));
    }

    #[test]
    fn edgeless_source_maps_anywhere_nonempty() {
        assert!(exists(&Graph::edgeless(1), &Graph::complete(4)));
        assert!(exists(&Graph::edgeless(3), &Graph::path(2)));
        assert!(!exists(&Graph::edgeless(1), &Graph::edgeless(0)));
    }

    #[test]
    fn empty_source_maps_vacuously() {
        assert!(exists(&Graph::edgeless(0), &Graph::edgeless(0)));
        assert!(exists(&Graph::edgeless(0), &Graph::complete(3)));
    }

    #[test]
    fn found_mappings_are_sound() {
        let g = Graph::cycle(6);
        let h = Graph::complete(3);
        let mapping = find_homomorphism(&g, &h, &cfg())
            .into_mapping()
            .expect("even cycle maps into K3");
        assert!(mapping.verify(&g, &h));
    }

    #[test]
    fn count_edge_into_k3() {
        // An edge maps onto K3 by any ordered pair of distinct nodes.
        let g = Graph::complete(2);
        let h = Graph::complete(3);
        let config = cfg();
        let mut solver = Solver::new(&g, &h, &config);
        let summary = solver.count_all();
        assert!(summary.complete);
        assert_eq!(summary.found, 6);
    }

    #[test]
    fn count_triangle_colorings() {
        // Homomorphisms C3 -> K3 are proper 3-colorings of a triangle.
        let g = Graph::cycle(3);
        let h = Graph::complete(3);
        let config = cfg();
        let mut solver = Solver::new(&g, &h, &config);
        assert_eq!(solver.count_all().found, 6);
    }

    #[test]
    fn directed_orientation_is_respected() {
        let arc = Graph::new(true, [0, 1], [(0, 1)]).unwrap();
        let back = Graph::new(true, [0, 1], [(1, 0)]).unwrap();
        let two_cycle = Graph::new(true, [0, 1], [(0, 1), (1, 0)]).unwrap();
        assert!(exists(&arc, &two_cycle));
        assert!(exists(&back, &two_cycle));
        assert!(exists(&arc, &back)); // relabeling
        let self_loop = Graph::new(true, [0], [(0, 0)]).unwrap();
        assert!(exists(&two_cycle, &self_loop));
        assert!(!exists(&two_cycle, &arc));
    }

    #[test]
    fn zero_budget_is_inconclusive() {
        let config = SearchConfig {
            budget: Some(std::time::Duration::ZERO),
            ..SearchConfig::default()
        };
        let g = Graph::cycle(5);
        let h = Graph::complete(2);
        assert!(matches!(
            find_homomorphism(&g, &h, &config),
            Outcome::Inconclusive
        ));
    }
}
