//! Per-trial records and the per-scenario sample that owns them.

use serde::Serialize;

/// One simulated period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trial {
    /// Sampled capability index. May be negative.
    pub capability_index: f64,
    /// Scrap rate in `[floor, 1]`.
    pub scrap_rate: f64,
    /// Rework rate in `[scrap_rate, 1]`.
    pub rework_rate: f64,
    /// Total period cost.
    pub total_cost: f64,
}

/// Trials generated for one labelled scenario, in sampling order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSample {
    label: String,
    trials: Vec<Trial>,
}

impl ScenarioSample {
    pub fn new(label: impl Into<String>, trials: Vec<Trial>) -> Self {
        Self {
            label: label.into(),
            trials,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Total cost column.
    pub fn costs(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.total_cost).collect()
    }
}
