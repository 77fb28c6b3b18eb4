mod oracle_test;

use ado_core::testutils::*;
use ado_core::NodeId;
use petgraph::graph::UnGraph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::*;

use super::*;

const EPSILON: f64 = 1e-9;

/// Graph plus its all-pairs exact distances.
struct Exact {
    graph: UnGraph<(), f64>,
    distances: Vec<Vec<f64>>,
}

impl Exact {
    fn new(graph: UnGraph<(), f64>) -> Self {
        let distances = all_pairs_exact(&graph);
        Self { graph, distances }
    }

    fn nodes(&self) -> impl Iterator<Item = NodeId> {
        0..self.graph.node_count()
    }
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
