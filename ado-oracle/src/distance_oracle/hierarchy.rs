use ado_core::{
    NodeId,
    OracleError,
    Result,
};
use rand::Rng;
use rand_distr::{
    Bernoulli,
    Distribution,
};
use tracing::{
    debug,
    instrument,
};

use crate::config::check_levels;

/// The nested landmark sets `A_0 ⊇ A_1 ⊇ … ⊇ A_k`.
///
/// Rather than storing each set, we store for every node its rank: the highest level whose set
/// contains it. `v ∈ A_i` iff `rank(v) >= i`, so the sets are nested by construction, `A_0` is every
/// node and `A_k` is empty because ranks never reach `k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandmarkHierarchy {
    /// The level count `k`.
    levels: usize,
    /// Highest level each node belongs to, always `< levels`.
    ranks: Vec<usize>,
}

impl LandmarkHierarchy {
    /// Sample a hierarchy over `node_count` nodes.
    ///
    /// Level `i + 1` keeps each member of level `i` independently with probability `n^(-1/k)`.
    /// Intermediate levels are allowed to come out empty.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidConfiguration`] when `levels` is zero.
    #[instrument(skip(rng))]
    pub fn sample<R: Rng + ?Sized>(node_count: usize, levels: usize, rng: &mut R) -> Result<Self> {
        check_levels(levels)?;

        let mut ranks = vec![0; node_count];
        if node_count == 0 {
            return Ok(Self { levels, ranks });
        }

        let probability = retention_probability(node_count, levels);
        let keep = Bernoulli::new(probability).map_err(|e| OracleError::invalid_configuration(e.to_string()))?;

        let mut survivors: Vec<NodeId> = (0..node_count).collect();
        for level in 1..levels {
            survivors.retain(|_| keep.sample(rng));
            for &node in &survivors {
                ranks[node] = level;
            }
            debug!(level, landmarks = survivors.len(), "sampled landmark level");
        }

        Ok(Self { levels, ranks })
    }

    /// Build a hierarchy from explicit ranks, `ranks[v]` being the highest level containing `v`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidConfiguration`] when `levels` is zero or any rank is not below
    /// `levels`.
    pub fn from_ranks(levels: usize, ranks: Vec<usize>) -> Result<Self> {
        check_levels(levels)?;
        if let Some((node, rank)) = ranks.iter().enumerate().find(|(_, &rank)| rank >= levels) {
            return Err(OracleError::invalid_configuration(format!(
                "node {node} has rank {rank}, but ranks must be below the level count {levels}"
            )));
        }
        Ok(Self { levels, ranks })
    }

    /// The level count `k`.
    #[must_use]
    pub const fn levels(&self) -> usize {
        self.levels
    }

    /// Number of nodes the hierarchy was sampled over.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ranks.len()
    }

    /// Highest level containing `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not below [`node_count`](Self::node_count).
    #[must_use]
    pub fn rank(&self, node: NodeId) -> usize {
        self.ranks[node]
    }

    /// Whether `node ∈ A_level`. Always false for `level >= k`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not below [`node_count`](Self::node_count).
    #[must_use]
    pub fn contains(&self, level: usize, node: NodeId) -> bool {
        level < self.levels && self.ranks[node] >= level
    }

    /// Members of `A_level` in ascending id order.
    pub fn members(&self, level: usize) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.ranks.len()).filter(move |&node| self.contains(level, node))
    }

    /// Members of `A_level \ A_{level+1}` in ascending id order.
    pub fn exclusive(&self, level: usize) -> impl Iterator<Item = NodeId> + '_ {
        self.ranks
            .iter()
            .enumerate()
            .filter(move |&(_, &rank)| rank == level)
            .map(|(node, _)| node)
    }

    /// `|A_0|, |A_1|, …, |A_k|`.
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.levels + 1];
        for &rank in &self.ranks {
            for size in &mut sizes[..=rank] {
                *size += 1;
            }
        }
        sizes
    }

    /// The highest level with at least one landmark, `None` for an empty graph.
    ///
    /// Queries never climb above this level.
    #[must_use]
    pub fn top_level(&self) -> Option<usize> {
        self.ranks.iter().copied().max()
    }
}

/// `n^(-1/k)`, the probability a landmark survives into the next level.
#[allow(clippy::cast_precision_loss)]
fn retention_probability(node_count: usize, levels: usize) -> f64 {
    (node_count as f64).powf(-1.0 / levels as f64).min(1.0)
}
