use std::collections::HashMap;

use ado_core::{
    Length,
    NodeId,
    WeightedGraph,
};
use rayon::prelude::*;
use tracing::{
    debug,
    instrument,
};

use super::hierarchy::LandmarkHierarchy;
use super::search::{
    truncated_dijkstra,
    INFINITY,
};

/// The landmark of one level closest to a node, and how far away it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Witness {
    /// The pivot `p_i(v)`; `None` when no landmark of the level is reachable.
    pub landmark: Option<NodeId>,
    /// `d(A_i, v)`, infinite when `landmark` is `None`.
    pub distance: Length,
}

impl Witness {
    /// The witness of a node on a level with no landmarks, in particular `A_k`.
    pub(crate) const UNREACHED: Self = Self { landmark: None, distance: INFINITY };
}

/// Landmarks close enough to a node to be remembered explicitly, with their distances.
pub(crate) type Bunch = HashMap<NodeId, Length>;

/// Everything preprocessing produces besides the hierarchy itself.
pub(crate) struct Tables {
    /// `witnesses[i][v]` for `i` in `0..=k`; row `k` is entirely [`Witness::UNREACHED`].
    pub witnesses: Vec<Vec<Witness>>,
    /// `bunches[v]` is `B(v)`.
    pub bunches: Vec<Bunch>,
    /// Number of bunch entries contributed by the landmarks exclusive to each level.
    pub bunch_entries: Vec<usize>,
}

/// Compute pivots and bunches for every level, top-down.
///
/// Level `i` is bounded by the distances of level `i + 1`, so the levels cannot be processed out
/// of order; within a level the per-landmark cluster searches are independent and run on the rayon
/// pool when `parallel` is set. Cluster results are merged in ascending landmark order, so the
/// tables do not depend on scheduling.
#[instrument(skip_all, fields(nodes = graph.node_count(), levels = hierarchy.levels()))]
pub(crate) fn build_tables<G>(graph: &G, hierarchy: &LandmarkHierarchy, parallel: bool) -> Tables
where
    G: WeightedGraph + Sync + ?Sized,
{
    let node_count = graph.node_count();
    let levels = hierarchy.levels();

    let mut witnesses = vec![Vec::new(); levels + 1];
    witnesses[levels] = vec![Witness::UNREACHED; node_count];
    let mut bunches = vec![Bunch::new(); node_count];
    let mut bunch_entries = vec![0; levels];

    for level in (0..levels).rev() {
        let landmarks: Vec<NodeId> = hierarchy.exclusive(level).collect();
        let upper = &witnesses[level + 1];

        let pivots = level_pivots(graph, &landmarks, upper);
        let clusters = level_clusters(graph, &landmarks, upper, parallel);

        for (&landmark, cluster) in landmarks.iter().zip(clusters) {
            bunch_entries[level] += cluster.len();
            for (node, distance) in cluster {
                bunches[node].insert(landmark, distance);
            }
        }

        debug!(level, landmarks = landmarks.len(), bunch_entries = bunch_entries[level], "level preprocessed");
        witnesses[level] = pivots;
    }

    Tables { witnesses, bunches, bunch_entries }
}

/// Pivots of one level.
///
/// A single multi-source search from the level's exclusive landmarks finds every node that is
/// strictly closer to one of them than to the next level; every other node keeps the next level's
/// witness. Together that is `d(A_i, v) = min(d(A_i \ A_{i+1}, v), d(A_{i+1}, v))`, with ties going
/// to the higher level.
fn level_pivots<G>(graph: &G, landmarks: &[NodeId], upper: &[Witness]) -> Vec<Witness>
where
    G: WeightedGraph + ?Sized,
{
    let mut pivots = upper.to_vec();
    truncated_dijkstra(
        graph,
        landmarks,
        |node| upper[node].distance,
        |settled| {
            pivots[settled.node] = Witness { landmark: Some(settled.source), distance: settled.distance };
        },
    );
    pivots
}

/// Cluster of every landmark of one level, in the order of `landmarks`.
///
/// The cluster of `w` is `{v : d(w, v) < d(A_{i+1}, v)}`. It is connected through shortest paths
/// from `w`, so the truncated search from `w` alone finds all of it.
fn level_clusters<G>(graph: &G, landmarks: &[NodeId], upper: &[Witness], parallel: bool) -> Vec<Vec<(NodeId, Length)>>
where
    G: WeightedGraph + Sync + ?Sized,
{
    let cluster = |&landmark: &NodeId| {
        let mut members = Vec::new();
        truncated_dijkstra(
            graph,
            &[landmark],
            |node| upper[node].distance,
            |settled| members.push((settled.node, settled.distance)),
        );
        members
    };

    if parallel {
        landmarks.par_iter().map(cluster).collect()
    } else {
        landmarks.iter().map(cluster).collect()
    }
}
