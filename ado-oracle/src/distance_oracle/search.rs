use std::cmp::Reverse;
use std::collections::{
    BinaryHeap,
    HashMap,
    HashSet,
};

use ado_core::{
    Length,
    NodeId,
    WeightedGraph,
};
use ordered_float::OrderedFloat;

/// Distance of an unreachable node.
pub(crate) const INFINITY: Length = OrderedFloat(f64::INFINITY);

/// Distance of a node to itself.
pub(crate) const ZERO: Length = OrderedFloat(0.0);

/// A node whose distance from the source set is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settled {
    /// The settled node.
    pub node: NodeId,
    /// The source the shortest accepted path starts from.
    pub source: NodeId,
    /// Length of that path.
    pub distance: Length,
}

/// Multi-source Dijkstra that only accepts a tentative distance to `v` while it is strictly below
/// `bound(v)`.
///
/// Every source starts at distance zero (and is itself subject to the bound). Nodes are reported to
/// `on_settle` in non-decreasing distance order, each at most once. The frontier is ordered by
/// `(distance, source)`, so a node reachable at the same distance from several sources is
/// attributed to the lowest source id. Search state is sparse: the cost is proportional to the
/// region explored, not to the size of the graph.
///
/// Returns the number of settled nodes.
///
/// # Panics
///
/// Panics if a source is not a node of `graph`; sources always come from the oracle's own
/// hierarchy, so this is a programming error.
pub(crate) fn truncated_dijkstra<G, B, F>(graph: &G, sources: &[NodeId], bound: B, mut on_settle: F) -> usize
where
    G: WeightedGraph + ?Sized,
    B: Fn(NodeId) -> Length,
    F: FnMut(Settled),
{
    let node_count = graph.node_count();
    let mut tentative: HashMap<NodeId, (Length, NodeId)> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    for &source in sources {
        assert!(source < node_count, "search source {source} is not a node of a graph with {node_count} nodes");
        if ZERO < bound(source) && tentative.insert(source, (ZERO, source)).is_none() {
            frontier.push(Reverse((ZERO, source, source)));
        }
    }

    while let Some(Reverse((distance, source, node))) = frontier.pop() {
        // Stale entry: the node was settled through a better (distance, source) pair.
        if !settled.insert(node) {
            continue;
        }
        on_settle(Settled { node, source, distance });

        for (next, length) in graph.neighbors_with_length(node) {
            let candidate = distance + length;
            if candidate >= bound(next) || settled.contains(&next) {
                continue;
            }
            let improves = tentative.get(&next).map_or(true, |&best| (candidate, source) < best);
            if improves {
                tentative.insert(next, (candidate, source));
                frontier.push(Reverse((candidate, source, next)));
            }
        }
    }

    settled.len()
}

/// Exact single-source distances, indexed by node id; unreachable nodes are [`INFINITY`].
pub(crate) fn shortest_distances<G: WeightedGraph + ?Sized>(graph: &G, source: NodeId) -> Vec<Length> {
    let mut distances = vec![INFINITY; graph.node_count()];
    truncated_dijkstra(graph, &[source], |_| INFINITY, |settled| distances[settled.node] = settled.distance);
    distances
}
