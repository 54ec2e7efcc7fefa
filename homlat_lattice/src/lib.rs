//! Incremental maintenance of a homomorphism partial order over graphs.
//!
//! The [`Lattice`] façade organizes stored graphs into equivalence classes of
//! mutually homomorphic graphs and a directed order over class
//! representatives. The homomorphism solver is its expensive oracle: every
//! relation that can be inferred from memoized positives (order
//! reachability), memoized negatives (the non-relation cache), or
//! transitivity is answered without a solver call.

mod cache;
mod classes;
mod error;
mod lattice;
mod nonrelation;
mod order;
mod relation;
mod selector;
mod snapshot;

pub use error::{LatticeError, SnapshotError};
pub use lattice::{Lattice, LatticeStats, Relation};
pub use snapshot::Snapshot;
