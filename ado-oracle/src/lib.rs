#![deny(
    // Strict on purpose: new lints are either fixed or explicitly allowed inline, which leaves a
    // trail for reviewers.
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
)]
#![warn(missing_docs)]

//! # ado-oracle – Thorup–Zwick approximate distance oracle
//!
//! The oracle preprocesses a connected, weighted, undirected graph once and then answers distance
//! queries in `O(k)` table lookups, returning an estimate that is never below the true distance and
//! never above `2k - 1` times it.
//!
//! ## Pipeline overview
//! 1. Validation ([`ado_core::validate`]) – reject negative or non-finite lengths, weighted
//!    self-loops and disconnected graphs before anything is built.
//! 2. Landmark sampling ([`LandmarkHierarchy::sample`]) – draw the nested landmark sets
//!    `A_0 ⊇ A_1 ⊇ … ⊇ A_k = ∅`, each level keeping a member of the previous one with probability
//!    `n^(-1/k)`.
//! 3. Table construction (`distance_oracle::tables`) – walk the levels top-down, running one
//!    truncated multi-source search per level for the pivots and one truncated search per
//!    exclusive landmark for the bunches.
//! 4. Queries ([`Oracle::query`]) – alternate between the two endpoints, climbing the pivots until
//!    one of them lands in the other endpoint's bunch.
//!
//! [`stretch::evaluate`] compares the oracle against exact distances for benchmarking harnesses.
//!
//! All long-running stages are annotated with [`tracing`] spans; the library never installs a
//! subscriber itself.

pub mod config;
pub mod distance_oracle;
pub mod stretch;

pub use ado_core::{
    GraphDefect,
    OracleError,
    Result,
};
pub use config::OracleConfig;
pub use distance_oracle::{
    LandmarkHierarchy,
    LevelStats,
    Oracle,
    OracleStats,
    Witness,
};
pub use stretch::StretchReport;
