use petgraph::graph::UnGraph;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use rstest::*;

/// Builds an undirected graph with `node_count` nodes from `(from, to, length)` triples.
pub fn graph_from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> UnGraph<(), f64> {
    let mut graph = UnGraph::with_capacity(node_count, edges.len());
    let nodes: Vec<_> = (0..node_count).map(|_| graph.add_node(())).collect();
    for &(from, to, length) in edges {
        graph.add_edge(nodes[from], nodes[to], length);
    }
    graph
}

/// A cycle `0 - 1 - ... - (n-1) - 0` with unit lengths.
pub fn cycle_graph(node_count: usize) -> UnGraph<(), f64> {
    let edges: Vec<_> = (0..node_count).map(|i| (i, (i + 1) % node_count, 1.0)).collect();
    graph_from_edges(node_count, &edges)
}

/// A path `0 - 1 - ... - (n-1)` whose i-th edge has length `i + 1`.
pub fn increasing_path_graph(node_count: usize) -> UnGraph<(), f64> {
    #[allow(clippy::cast_precision_loss)]
    let edges: Vec<_> = (1..node_count).map(|i| (i - 1, i, i as f64)).collect();
    graph_from_edges(node_count, &edges)
}

/// A `width x height` grid with unit lengths; node `(x, y)` has id `y * width + x`.
pub fn grid_graph(width: usize, height: usize) -> UnGraph<(), f64> {
    let mut edges = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            if x + 1 < width {
                edges.push((id, id + 1, 1.0));
            }
            if y + 1 < height {
                edges.push((id, id + width, 1.0));
            }
        }
    }
    graph_from_edges(width * height, &edges)
}

/// A connected graph: a random spanning tree plus `extra_edges` random chords, with integral
/// lengths drawn uniformly from `[1, max_length]` so that path sums are exact.
pub fn random_connected_graph(node_count: usize, extra_edges: usize, max_length: u32, seed: u64) -> UnGraph<(), f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(node_count + extra_edges);

    for node in 1..node_count {
        let parent = rng.gen_range(0..node);
        edges.push((parent, node, f64::from(rng.gen_range(1..=max_length))));
    }
    if node_count > 1 {
        for _ in 0..extra_edges {
            let from = rng.gen_range(0..node_count);
            let to = rng.gen_range(0..node_count);
            if from != to {
                edges.push((from, to, f64::from(rng.gen_range(1..=max_length))));
            }
        }
    }

    graph_from_edges(node_count, &edges)
}

#[fixture]
pub fn five_cycle() -> UnGraph<(), f64> {
    cycle_graph(5)
}

#[fixture]
pub fn small_grid() -> UnGraph<(), f64> {
    grid_graph(6, 5)
}

#[fixture]
pub fn weighted_path() -> UnGraph<(), f64> {
    increasing_path_graph(8)
}

#[fixture]
pub fn random_graph() -> UnGraph<(), f64> {
    random_connected_graph(60, 90, 10, 0xAD0_5EED)
}
