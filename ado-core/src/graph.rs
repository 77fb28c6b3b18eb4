//! The weighted graph capability consumed by the oracle.
//!
//! The oracle never depends on a concrete graph type: it only needs to know how many nodes there
//! are (ids are dense, `0..node_count`) and how to walk the weighted neighbourhood of a node. The
//! blanket implementation below covers any undirected [`petgraph::Graph`] whose edge payload knows
//! its own length, which is how the benchmarking harness hands graphs in.

use ordered_float::OrderedFloat;
use petgraph::graph::{
    Graph,
    IndexType,
    NodeIndex,
};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use tracing::{
    debug,
    instrument,
};

use crate::errors::GraphDefect;

/// Dense node identifier, `0..node_count`.
pub type NodeId = usize;

/// Path and edge lengths; totally ordered so they can key a priority queue.
pub type Length = OrderedFloat<f64>;

/// Trait for edge payloads that carry a length.
///
/// This plays the same role for the oracle that a cost function plays for a plain Dijkstra: it
/// lets the caller keep whatever edge type it already has.
pub trait EdgeLength {
    /// Returns the length of this edge.
    fn length(&self) -> Length;
}

macro_rules! numeric_edge_length {
    ($($ty:ty),*) => {
        $(
            impl EdgeLength for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn length(&self) -> Length {
                    OrderedFloat(*self as f64)
                }
            }
        )*
    };
}

numeric_edge_length!(f32, f64, i32, i64, u32, u64, usize);

impl EdgeLength for OrderedFloat<f64> {
    fn length(&self) -> Length {
        *self
    }
}

// Unweighted graphs: every edge has unit length.
impl EdgeLength for () {
    fn length(&self) -> Length {
        OrderedFloat(1.0)
    }
}

/// Read-only weighted adjacency over dense node ids.
pub trait WeightedGraph {
    /// Number of nodes; valid ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Neighbours of `node` together with the length of the connecting edge.
    ///
    /// Undirected graphs report every edge from both endpoints.
    fn neighbors_with_length(&self, node: NodeId) -> impl Iterator<Item = (NodeId, Length)> + '_;

    /// Every edge exactly once, as `(from, to, length)`.
    fn edges_with_length(&self) -> impl Iterator<Item = (NodeId, NodeId, Length)> + '_;
}

impl<N, E, Ix> WeightedGraph for Graph<N, E, Undirected, Ix>
where
    E: EdgeLength,
    Ix: IndexType,
{
    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn neighbors_with_length(&self, node: NodeId) -> impl Iterator<Item = (NodeId, Length)> + '_ {
        self.edges(NodeIndex::new(node)).map(move |edge| {
            let other = if edge.source().index() == node { edge.target() } else { edge.source() };
            (other.index(), edge.weight().length())
        })
    }

    fn edges_with_length(&self) -> impl Iterator<Item = (NodeId, NodeId, Length)> + '_ {
        self.edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), edge.weight().length()))
    }
}

/// Check that `graph` satisfies the oracle's input contract.
///
/// Lengths must be finite and non-negative, self-loops must have length zero, and the graph must be
/// connected (the query walk only terminates when every node can reach the top landmark level).
/// The sum of all lengths must be finite too: it bounds every shortest path, so no search can
/// overflow to infinity on an accepted graph.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn validate<G: WeightedGraph + ?Sized>(graph: &G) -> std::result::Result<(), GraphDefect> {
    let node_count = graph.node_count();
    let mut components = UnionFind::<NodeId>::new(node_count);
    let mut edge_count = 0usize;
    let mut total_length = 0.0_f64;

    for (from, to, length) in graph.edges_with_length() {
        let length = length.into_inner();
        if !length.is_finite() {
            return Err(GraphDefect::NonFiniteLength { from, to, length });
        }
        if length < 0.0 {
            return Err(GraphDefect::NegativeLength { from, to, length });
        }
        if from == to && length != 0.0 {
            return Err(GraphDefect::NonZeroSelfLoop { node: from, length });
        }
        components.union(from, to);
        edge_count += 1;
        total_length += length;
    }

    if !total_length.is_finite() {
        return Err(GraphDefect::LengthOverflow { edges: edge_count });
    }

    let roots = (0..node_count).filter(|&node| components.find(node) == node).count();
    if roots > 1 {
        return Err(GraphDefect::Disconnected { components: roots });
    }

    debug!(edge_count, "graph validated");
    Ok(())
}
