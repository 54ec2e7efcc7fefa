//! Error types shared across the workspace.

use thiserror::Error;

use crate::id::GraphId;

/// Structural problems with a graph document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge references a node that is not in the node set.
    #[error("edge ({from}, {to}) references undeclared node {missing}")]
    DanglingEndpoint {
        /// Source endpoint of the offending edge.
        from: u32,
        /// Target endpoint of the offending edge.
        to: u32,
        /// Whichever endpoint is missing from the node set.
        missing: u32,
    },
}

/// Failures surfaced by a [`crate::GraphStore`].
///
/// A `NotFound` aborts whatever operation required the load; callers that
/// want retries own them (there is no retry in the core).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier does not resolve to a stored graph.
    #[error("graph {0} not found in store")]
    NotFound(GraphId),
    /// The stored document exists but does not parse into a valid graph.
    #[error("graph {id} is malformed: {reason}")]
    Malformed {
        /// Identifier of the unreadable graph.
        id: GraphId,
        /// Human-readable parse or validation failure.
        reason: String,
    },
}
