//! Graph fixtures and an exact shortest-path baseline for tests.

mod graphs;

use std::collections::HashMap;

pub use graphs::*;
use petgraph::algo::dijkstra;
use petgraph::graph::{
    NodeIndex,
    UnGraph,
};
use petgraph::visit::EdgeRef;

use crate::graph::{
    EdgeLength,
    NodeId,
};

/// Exact single-source distances computed with petgraph's Dijkstra, indexed by node id.
///
/// Unreachable nodes are reported as `f64::INFINITY`.
pub fn exact_distances<N, E: EdgeLength>(graph: &UnGraph<N, E>, source: NodeId) -> Vec<f64> {
    let found: HashMap<NodeIndex, f64> =
        dijkstra(graph, NodeIndex::new(source), None, |edge| edge.weight().length().into_inner());

    (0..graph.node_count())
        .map(|node| found.get(&NodeIndex::new(node)).copied().unwrap_or(f64::INFINITY))
        .collect()
}

/// Exact distances between every pair of nodes, `result[u][v]`.
pub fn all_pairs_exact<N, E: EdgeLength>(graph: &UnGraph<N, E>) -> Vec<Vec<f64>> {
    (0..graph.node_count()).map(|source| exact_distances(graph, source)).collect()
}
