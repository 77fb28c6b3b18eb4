//! Thorup–Zwick approximate distance oracles answer distance queries on a weighted undirected graph
//! without searching the graph at query time.
//!
//! The oracle has two stages:
//! 1. Preprocessing:
//!     * Sample a nested hierarchy of landmark sets `A_0 = V ⊇ A_1 ⊇ … ⊇ A_{k-1} ⊇ A_k = ∅`.
//!     * For every level `i` and node `v`, find the pivot `p_i(v)`, the landmark of `A_i` closest to
//!       `v`, and its distance `d(A_i, v)`.
//!     * For every landmark `w ∈ A_i \ A_{i+1}`, find its cluster: the nodes `v` with
//!       `d(w, v) < d(A_{i+1}, v)`. Membership is stored the other way round, as `w ∈ B(v)`, the bunch
//!       of `v`.
//! 2. Querying:
//!     * Starting from `w = u` at level 0, climb one level at a time, swapping the roles of `u` and
//!       `v` on every step and taking `w = p_i(u)`, until `w ∈ B(v)`. Both `d(w, u)` and `d(w, v)` are
//!       then known and their sum is the answer.
//!
//! Both the pivots and the clusters come from a single truncated Dijkstra primitive: a search that
//! only accepts a tentative distance to `v` when it is strictly below `d(A_{i+1}, v)`. That bound is
//! what keeps the expected total bunch size at `O(k n^(1 + 1/k))`.

/// Nested landmark sets
mod hierarchy;
/// The oracle value and its query engine
mod oracle;
/// Truncated priority-queue search shared by every preprocessing step
pub(crate) mod search;
/// Witness and bunch tables
mod tables;

#[cfg(test)]
mod tests;

pub use hierarchy::LandmarkHierarchy;
pub use oracle::{
    LevelStats,
    Oracle,
    OracleStats,
};
pub use tables::Witness;
