use thiserror::Error;

use crate::graph::NodeId;

/// Shorthand for results whose failure type is [`OracleError`].
pub type Result<T> = std::result::Result<T, OracleError>;

/// Every way a caller can violate the oracle's contract.
///
/// None of these are transient: configuration and graph errors are reported by `build`, node-range
/// errors by `query`, and all of them propagate untouched to the caller.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OracleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] GraphDefect),

    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    OutOfRangeNode { node: NodeId, node_count: usize },
}

impl OracleError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// The reason a graph was rejected by [`validate`](crate::graph::validate).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphDefect {
    #[error("edge ({from}, {to}) has non-finite length {length}")]
    NonFiniteLength { from: NodeId, to: NodeId, length: f64 },

    #[error("edge ({from}, {to}) has negative length {length}")]
    NegativeLength { from: NodeId, to: NodeId, length: f64 },

    #[error("self-loop on node {node} has non-zero length {length}")]
    NonZeroSelfLoop { node: NodeId, length: f64 },

    #[error("total edge length overflows to infinity ({edges} edges)")]
    LengthOverflow { edges: usize },

    #[error("graph is not connected ({components} components)")]
    Disconnected { components: usize },
}
