//! Shared data model for the homomorphism lattice crates.
//!
//! This crate holds everything the solver and the lattice agree on without
//! depending on each other: the [`Graph`] model, opaque [`GraphId`]
//! identifiers, the [`GraphStore`] collaborator interface, configuration, and
//! the shared error types.

mod config;
mod error;
mod graph;
mod id;
mod store;

pub use config::{LatticeConfig, SearchConfig};
pub use error::{GraphError, StoreError};
pub use graph::{Graph, NodeId};
pub use id::GraphId;
pub use store::{GraphStore, MemoryStore};
