//! Build-time configuration for the oracle.

use ado_core::{
    OracleError,
    Result,
};
use derive_setters::Setters;
use serde::{
    Deserialize,
    Serialize,
};

/// Parameters for [`Oracle::build`](crate::Oracle::build).
///
/// Deserializable so that a harness can keep it next to its own settings; missing fields fall back
/// to [`OracleConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(strip_option)]
pub struct OracleConfig {
    /// The level count `k`; answers are within a factor `2k - 1` of the true distance.
    pub levels: usize,
    /// Seed for landmark sampling. `None` draws a fresh seed from the OS on every build.
    pub seed: Option<u64>,
    /// Run the per-landmark searches of a level on the rayon pool.
    pub parallel: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { levels: 3, seed: None, parallel: true }
    }
}

impl OracleConfig {
    /// Reject configurations the oracle cannot be built from.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidConfiguration`] when `levels` is zero.
    pub fn validate(&self) -> Result<()> {
        check_levels(self.levels)
    }

    /// The worst-case ratio between an answer and the true distance, `2k - 1`.
    #[must_use]
    pub fn stretch_bound(&self) -> f64 {
        stretch_bound(self.levels)
    }
}

/// Reject a level count of zero.
pub(crate) fn check_levels(levels: usize) -> Result<()> {
    if levels < 1 {
        return Err(OracleError::invalid_configuration(format!(
            "level count must be at least 1, got {levels}"
        )));
    }
    Ok(())
}

/// `2k - 1` for a level count `k`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn stretch_bound(levels: usize) -> f64 {
    (2 * levels).saturating_sub(1) as f64
}
