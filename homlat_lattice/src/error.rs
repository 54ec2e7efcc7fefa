//! Lattice error taxonomy.

use homlat_common::{GraphId, StoreError};
use thiserror::Error;

/// Fatal failures of lattice operations.
///
/// A missing homomorphism is never an error; it is an ordinary negative
/// relation. These variants cover genuinely abnormal conditions, and none of
/// them is retried by the core.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// The memoization caches contradict each other. This indicates a bug in
    /// the incremental maintenance logic; the operation is aborted because
    /// downstream structure would be unsound.
    #[error("invariant violation for pair {from} -> {to} in the {cache}: {detail}")]
    InvariantViolation {
        /// Source of the contradicting pair.
        from: GraphId,
        /// Target of the contradicting pair.
        to: GraphId,
        /// Which cache rejected the update.
        cache: &'static str,
        /// What was being recorded.
        detail: String,
    },

    /// The search budget ran out before the relation was decided.
    #[error("search budget exhausted while deciding {from} -> {to}")]
    Inconclusive {
        /// Source of the undecided pair.
        from: GraphId,
        /// Target of the undecided pair.
        to: GraphId,
    },

    /// A graph required by the operation could not be loaded. The mutation
    /// that needed it is aborted with prior state unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted snapshot failed validation.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Snapshot validation failures, reported at load time before any lattice
/// is constructed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document shape is inconsistent.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}
