//! Capability index to scrap rate mapping.
//!
//! Two heuristics are provided. Both are strictly decreasing in the
//! capability index over the practical range and are clamped to
//! `[floor, 1]` so the simulated cost never collapses to zero.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8 (relationship between Cpk and fraction nonconforming).

use serde::{Deserialize, Serialize};
use u_numflow::special::standard_normal_cdf;

use crate::error::ConfigError;

/// Default exponential decay constant.
pub const DEFAULT_DECAY: f64 = 2.5;

/// Default minimum scrap rate.
pub const DEFAULT_FLOOR: f64 = 0.002;

/// Heuristic mapping a capability index to a scrap rate.
///
/// # Examples
///
/// ```
/// use u_costrisk::cost::ScrapModel;
///
/// let model = ScrapModel::default();
/// let rate = model.scrap_rate(1.1);
/// assert!((rate - (-2.5_f64 * 1.1).exp()).abs() < 1e-15);
///
/// // A very capable process still scraps at the floor rate.
/// assert_eq!(model.scrap_rate(10.0), 0.002);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrapModel {
    /// `max(floor, exp(-decay * cpk))`.
    Exponential { decay: f64, floor: f64 },
    /// Fraction of a centered normal process beyond the nearest
    /// specification limit: `Φ(-3 * cpk)`.
    NormalTail { floor: f64 },
}

impl Default for ScrapModel {
    fn default() -> Self {
        Self::Exponential {
            decay: DEFAULT_DECAY,
            floor: DEFAULT_FLOOR,
        }
    }
}

impl ScrapModel {
    /// Minimum scrap rate this model can return.
    pub fn floor(&self) -> f64 {
        match *self {
            Self::Exponential { floor, .. } | Self::NormalTail { floor } => floor,
        }
    }

    /// Maps a capability index to a scrap rate in `[floor, 1]`.
    ///
    /// Defined for every input. A NaN index is treated as the worst case
    /// and yields `1.0`.
    pub fn scrap_rate(&self, capability_index: f64) -> f64 {
        if capability_index.is_nan() {
            return 1.0;
        }
        let raw = match *self {
            Self::Exponential { decay, .. } => (-decay * capability_index).exp(),
            Self::NormalTail { .. } => standard_normal_cdf(-3.0 * capability_index),
        };
        raw.clamp(self.floor(), 1.0)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let floor = self.floor();
        if !floor.is_finite() || floor <= 0.0 || floor > 1.0 {
            return Err(ConfigError::invalid(
                "scrap_model.floor",
                format!("must be in (0, 1], got {floor}"),
            ));
        }
        if let Self::Exponential { decay, .. } = *self {
            if !decay.is_finite() || decay <= 0.0 {
                return Err(ConfigError::invalid(
                    "scrap_model.decay",
                    format!("must be positive and finite, got {decay}"),
                ));
            }
        }
        Ok(())
    }
}
