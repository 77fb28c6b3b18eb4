//! Shared building blocks for the approximate distance oracle: the weighted graph capability the
//! oracle consumes, the validation applied to a graph before anything is built on top of it, and
//! the error taxonomy surfaced to callers.

pub mod errors;
pub mod graph;

#[cfg(feature = "testutils")]
pub mod testutils;

pub use errors::{
    GraphDefect,
    OracleError,
    Result,
};
pub use graph::{
    validate,
    EdgeLength,
    Length,
    NodeId,
    WeightedGraph,
};
