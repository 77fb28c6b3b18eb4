use std::time::{
    Duration,
    Instant,
};

use ado_core::{
    Length,
    NodeId,
    OracleError,
    Result,
    WeightedGraph,
};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use rayon::prelude::*;
use tracing::{
    info,
    instrument,
};

use super::hierarchy::LandmarkHierarchy;
use super::tables::{
    build_tables,
    Bunch,
    Tables,
    Witness,
};
use crate::config::OracleConfig;

/// Size of one level of a built oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// `|A_i|`.
    pub landmarks: usize,
    /// `|A_i \ A_{i+1}|`.
    pub exclusive: usize,
    /// Bunch entries pointing at the exclusive landmarks of this level (the total cluster size).
    pub bunch_entries: usize,
}

/// Preprocessing summary of a built oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleStats {
    /// Number of graph nodes.
    pub nodes: usize,
    /// One entry per level `0..k`.
    pub levels: Vec<LevelStats>,
    /// Sum of all bunch sizes, the dominant term of the oracle's space.
    pub total_bunch_entries: usize,
    /// Wall time spent building the tables.
    pub preprocessing: Duration,
}

impl OracleStats {
    /// Summarize a hierarchy and the per-level bunch counts produced for it.
    fn collect(hierarchy: &LandmarkHierarchy, bunch_entries: &[usize], preprocessing: Duration) -> Self {
        let sizes = hierarchy.level_sizes();
        let levels = (0..hierarchy.levels())
            .map(|level| LevelStats {
                landmarks: sizes[level],
                exclusive: sizes[level] - sizes[level + 1],
                bunch_entries: bunch_entries[level],
            })
            .collect();

        Self {
            nodes: hierarchy.node_count(),
            levels,
            total_bunch_entries: bunch_entries.iter().sum(),
            preprocessing,
        }
    }
}

// On query symmetry: the alternating ascent started from u and the one started from v do not in
// general meet the same witness, so a single ascent can answer (u, v) and (v, u) differently. We
// run both and keep the smaller estimate. Each ascent is already within the 2k - 1 bound, so the
// minimum is too, and symmetry then holds for every pair at the price of doubling the O(k) lookups.

/// A Thorup–Zwick approximate distance oracle.
///
/// Built once from a connected weighted graph, then immutable: every table is owned by the oracle
/// and queries only read them, so a single oracle can be shared across threads freely.
#[derive(Clone, Debug)]
pub struct Oracle {
    /// The sampled landmark sets.
    hierarchy: LandmarkHierarchy,
    /// `witnesses[i][v]` for `i` in `0..=k`.
    witnesses: Vec<Vec<Witness>>,
    /// `bunches[v]` is `B(v)`.
    bunches: Vec<Bunch>,
    /// Preprocessing summary.
    stats: OracleStats,
}

impl Oracle {
    /// Validate `graph`, sample a landmark hierarchy and build the oracle tables.
    ///
    /// Sampling is seeded from `config.seed` when set, from the OS otherwise.
    ///
    /// # Errors
    ///
    /// [`OracleError::InvalidConfiguration`] when `config.levels` is zero and
    /// [`OracleError::InvalidGraph`] when `graph` has a negative, non-finite or self-loop length, or
    /// is disconnected.
    #[instrument(skip(graph), fields(nodes = graph.node_count()))]
    pub fn build<G>(graph: &G, config: &OracleConfig) -> Result<Self>
    where
        G: WeightedGraph + Sync + ?Sized,
    {
        let mut rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::build_with_rng(graph, config, &mut rng)
    }

    /// Like [`build`](Self::build), drawing landmarks from `rng` and ignoring `config.seed`.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    #[instrument(skip(graph, rng), fields(nodes = graph.node_count()))]
    pub fn build_with_rng<G, R>(graph: &G, config: &OracleConfig, rng: &mut R) -> Result<Self>
    where
        G: WeightedGraph + Sync + ?Sized,
        R: Rng + ?Sized,
    {
        config.validate()?;
        ado_core::validate(graph)?;

        let hierarchy = LandmarkHierarchy::sample(graph.node_count(), config.levels, rng)?;
        Ok(Self::preprocess(graph, hierarchy, config.parallel))
    }

    /// Build the oracle tables over an explicitly chosen hierarchy.
    ///
    /// # Errors
    ///
    /// [`OracleError::InvalidGraph`] as for [`build`](Self::build), and
    /// [`OracleError::InvalidConfiguration`] when the hierarchy does not cover exactly the nodes
    /// of `graph`.
    #[instrument(skip(graph, hierarchy), fields(nodes = graph.node_count(), levels = hierarchy.levels()))]
    pub fn build_with_hierarchy<G>(graph: &G, hierarchy: LandmarkHierarchy, parallel: bool) -> Result<Self>
    where
        G: WeightedGraph + Sync + ?Sized,
    {
        ado_core::validate(graph)?;
        if hierarchy.node_count() != graph.node_count() {
            return Err(OracleError::invalid_configuration(format!(
                "hierarchy covers {} nodes but the graph has {}",
                hierarchy.node_count(),
                graph.node_count()
            )));
        }
        Ok(Self::preprocess(graph, hierarchy, parallel))
    }

    /// Run the table construction for an already validated graph.
    fn preprocess<G>(graph: &G, hierarchy: LandmarkHierarchy, parallel: bool) -> Self
    where
        G: WeightedGraph + Sync + ?Sized,
    {
        let started = Instant::now();
        let Tables { witnesses, bunches, bunch_entries } = build_tables(graph, &hierarchy, parallel);
        let stats = OracleStats::collect(&hierarchy, &bunch_entries, started.elapsed());

        info!(
            nodes = stats.nodes,
            levels = hierarchy.levels(),
            total_bunch_entries = stats.total_bunch_entries,
            elapsed_ms = stats.preprocessing.as_millis(),
            "oracle built"
        );

        Self { hierarchy, witnesses, bunches, stats }
    }

    /// Approximate distance between `u` and `v`.
    ///
    /// The estimate is at least the true distance and at most `2k - 1` times it, and
    /// `query(u, v) == query(v, u)`.
    ///
    /// # Errors
    ///
    /// [`OracleError::OutOfRangeNode`] when either id is not a node of the graph the oracle was
    /// built from.
    pub fn query(&self, u: NodeId, v: NodeId) -> Result<f64> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v {
            return Ok(0.0);
        }

        Ok(self.ascend(u, v).min(self.ascend(v, u)).into_inner())
    }

    /// Answer a batch of queries on the rayon pool, in the order given.
    ///
    /// # Errors
    ///
    /// The first [`OracleError::OutOfRangeNode`] encountered, if any.
    pub fn query_many(&self, pairs: &[(NodeId, NodeId)]) -> Result<Vec<f64>> {
        pairs.par_iter().map(|&(u, v)| self.query(u, v)).collect()
    }

    /// The alternating ascent from `u` towards `v`.
    ///
    /// At level `i` the candidate witness is `p_i(u)`; if it is not in `B(v)` the endpoints swap and
    /// the next level is tried. The top populated level's landmarks are in every bunch, so the
    /// loop stops there at the latest.
    fn ascend(&self, mut u: NodeId, mut v: NodeId) -> Length {
        let mut level = 0;
        let mut witness = u;
        loop {
            if let Some(&to_v) = self.bunches[v].get(&witness) {
                return self.witnesses[level][u].distance + to_v;
            }
            level += 1;
            std::mem::swap(&mut u, &mut v);
            witness = self.witnesses[level][u]
                .landmark
                .expect("every node of a connected graph has a pivot up to the top populated level");
        }
    }

    /// Number of nodes of the graph the oracle was built from.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.bunches.len()
    }

    /// The level count `k`.
    #[must_use]
    pub const fn levels(&self) -> usize {
        self.hierarchy.levels()
    }

    /// The landmark hierarchy the tables were built over.
    #[must_use]
    pub const fn hierarchy(&self) -> &LandmarkHierarchy {
        &self.hierarchy
    }

    /// Preprocessing summary.
    #[must_use]
    pub const fn stats(&self) -> &OracleStats {
        &self.stats
    }

    /// The nearest landmark of `A_level` to `node`; levels at or above `k` are empty.
    ///
    /// # Errors
    ///
    /// [`OracleError::OutOfRangeNode`] when `node` is not a node of the graph.
    pub fn witness(&self, level: usize, node: NodeId) -> Result<Witness> {
        self.check_node(node)?;
        Ok(self.witnesses.get(level).map_or(Witness::UNREACHED, |row| row[node]))
    }

    /// `B(node)` as `(landmark, distance)` pairs in ascending landmark order.
    ///
    /// # Errors
    ///
    /// [`OracleError::OutOfRangeNode`] when `node` is not a node of the graph.
    pub fn bunch(&self, node: NodeId) -> Result<Vec<(NodeId, f64)>> {
        self.check_node(node)?;
        Ok(self.bunches[node]
            .iter()
            .map(|(&landmark, distance)| (landmark, distance.into_inner()))
            .sorted_by_key(|&(landmark, _)| landmark)
            .collect())
    }

    /// Reject ids outside `0..node_count`.
    fn check_node(&self, node: NodeId) -> Result<()> {
        let node_count = self.node_count();
        if node >= node_count {
            return Err(OracleError::OutOfRangeNode { node, node_count });
        }
        Ok(())
    }
}
