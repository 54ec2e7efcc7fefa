//! Backtracking search for graph homomorphisms.
//!
//! Given a source graph `G` and a target graph `H`, [`Solver`] decides
//! whether a structure-preserving node mapping `G -> H` exists (every edge of
//! `G` maps to an edge of `H`) and can enumerate all such mappings. The
//! search is depth-first over assignments of `G`'s nodes with dynamic
//! variable ordering, candidate reordering, and per-call fail-first
//! counters; see [`SearchConfig`](homlat_common::SearchConfig) for the
//! heuristic weights.
//!
//! A negative answer is not an error: exhausting the search space yields
//! [`Outcome::Exhausted`], the defined "no homomorphism" result.

mod index;
mod mapping;
mod solver;
mod state;

pub mod heuristics;

pub use heuristics::SearchStats;
pub use mapping::Mapping;
pub use solver::{Enumeration, Outcome, Solver, find_homomorphism};
