//! Measure how far an oracle's answers are from exact shortest-path distances.
//!
//! Intended for benchmarking harnesses: exact distances are computed here with an unbounded run of
//! the same search primitive the oracle is built with, one source at a time, and every oracle
//! answer from that source is compared against them.

use std::time::{
    Duration,
    Instant,
};

use ado_core::{
    NodeId,
    OracleError,
    Result,
    WeightedGraph,
};
use rayon::prelude::*;
use tracing::{
    info,
    instrument,
};

use crate::config::stretch_bound;
use crate::distance_oracle::search::{
    shortest_distances,
    ZERO,
};
use crate::distance_oracle::Oracle;

/// Relative slack allowed before a stretch counts as a bound violation (float summation noise).
const BOUND_TOLERANCE: f64 = 1e-9;

/// Stretch statistics over every `(source, target)` pair with a positive exact distance.
///
/// With no such pair the stretch fields are all `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct StretchReport {
    /// Number of sources evaluated.
    pub sources: usize,
    /// Number of pairs that contributed a stretch value.
    pub pairs: usize,
    /// Mean stretch over all pairs.
    pub mean: f64,
    /// Mean over sources of each source's mean stretch.
    pub mean_per_source: f64,
    /// Smallest pair stretch.
    pub min: f64,
    /// Largest pair stretch.
    pub max: f64,
    /// The guaranteed bound `2k - 1`.
    pub bound: f64,
    /// Pairs whose stretch exceeds `bound`.
    pub violations: usize,
    /// Mean wall time of a single oracle query.
    pub mean_query_time: Duration,
    /// Mean wall time of one exact single-source search, the baseline the oracle replaces.
    pub mean_exact_time: Duration,
}

/// Everything measured from one source.
struct SourceSample {
    /// Stretch of every pair with a positive exact distance.
    stretches: Vec<f64>,
    /// Number of oracle queries issued.
    queries: usize,
    /// Total time spent inside those queries.
    query_time: Duration,
    /// Time spent computing the exact distances from the source.
    exact_time: Duration,
}

/// Compare `oracle` against exact distances on `graph` from each of `sources`.
///
/// Sources are processed in parallel.
///
/// # Errors
///
/// [`OracleError::InvalidConfiguration`] when `graph` is not the size of the graph the oracle was
/// built from, [`OracleError::OutOfRangeNode`] for a source outside the graph.
#[instrument(skip_all, fields(nodes = graph.node_count(), levels = oracle.levels(), sources = sources.len()))]
pub fn evaluate<G>(graph: &G, oracle: &Oracle, sources: &[NodeId]) -> Result<StretchReport>
where
    G: WeightedGraph + Sync + ?Sized,
{
    let node_count = graph.node_count();
    if node_count != oracle.node_count() {
        return Err(OracleError::invalid_configuration(format!(
            "graph has {node_count} nodes but the oracle was built over {}",
            oracle.node_count()
        )));
    }
    if let Some(&node) = sources.iter().find(|&&node| node >= node_count) {
        return Err(OracleError::OutOfRangeNode { node, node_count });
    }

    let samples = sources
        .par_iter()
        .map(|&source| measure_source(graph, oracle, source))
        .collect::<Result<Vec<_>>>()?;

    let report = summarize(&samples, stretch_bound(oracle.levels()));
    info!(
        pairs = report.pairs,
        mean = report.mean,
        max = report.max,
        violations = report.violations,
        "stretch evaluated"
    );
    Ok(report)
}

/// Query the oracle from `source` to every other node and compare with the exact distances.
fn measure_source<G>(graph: &G, oracle: &Oracle, source: NodeId) -> Result<SourceSample>
where
    G: WeightedGraph + ?Sized,
{
    let started = Instant::now();
    let exact = shortest_distances(graph, source);
    let exact_time = started.elapsed();

    let mut stretches = Vec::with_capacity(exact.len());
    let mut queries = 0;
    let mut query_time = Duration::ZERO;

    for (target, &distance) in exact.iter().enumerate() {
        if target == source {
            continue;
        }
        let started = Instant::now();
        let estimate = oracle.query(source, target)?;
        query_time += started.elapsed();
        queries += 1;

        if distance > ZERO && distance.is_finite() {
            stretches.push(estimate / distance.into_inner());
        }
    }

    Ok(SourceSample { stretches, queries, query_time, exact_time })
}

/// Fold per-source samples into a report.
#[allow(clippy::cast_precision_loss)]
fn summarize(samples: &[SourceSample], bound: f64) -> StretchReport {
    let all = || samples.iter().flat_map(|sample| sample.stretches.iter().copied());

    let pairs = all().count();
    let (mean, min, max) = if pairs == 0 {
        (1.0, 1.0, 1.0)
    } else {
        (
            all().sum::<f64>() / pairs as f64,
            all().fold(f64::INFINITY, f64::min),
            all().fold(f64::NEG_INFINITY, f64::max),
        )
    };

    let source_means: Vec<f64> = samples
        .iter()
        .filter(|sample| !sample.stretches.is_empty())
        .map(|sample| sample.stretches.iter().sum::<f64>() / sample.stretches.len() as f64)
        .collect();
    let mean_per_source = if source_means.is_empty() {
        1.0
    } else {
        source_means.iter().sum::<f64>() / source_means.len() as f64
    };

    let violations = all().filter(|&stretch| stretch > bound * (1.0 + BOUND_TOLERANCE)).count();

    let queries: usize = samples.iter().map(|sample| sample.queries).sum();
    let query_time: Duration = samples.iter().map(|sample| sample.query_time).sum();
    let mean_query_time = mean_duration(query_time, queries);
    let mean_exact_time = mean_duration(samples.iter().map(|sample| sample.exact_time).sum(), samples.len());

    StretchReport {
        sources: samples.len(),
        pairs,
        mean,
        mean_per_source,
        min,
        max,
        bound,
        violations,
        mean_query_time,
        mean_exact_time,
    }
}

/// `total / count`, zero when nothing was measured.
fn mean_duration(total: Duration, count: usize) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        total / u32::try_from(count).unwrap_or(u32::MAX)
    }
}
