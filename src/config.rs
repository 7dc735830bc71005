//! Simulation configuration.
//!
//! [`SimulationConfig`] is an explicit value handed to
//! [`SimulationRunner`](crate::simulation::SimulationRunner). Every field has
//! a default, so a TOML document only needs to name what it changes:
//!
//! ```toml
//! trials = 5000
//! cost_threshold = 30000.0
//!
//! [cost]
//! volume = 12000.0
//!
//! [[scenarios]]
//! label = "Current"
//! mean_capability_index = 1.0
//!
//! [[scenarios]]
//! label = "Target"
//! mean_capability_index = 1.33
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost::{CostParameters, ScrapModel};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Scenario and perturbation parameters
// ---------------------------------------------------------------------------

/// One scenario: a label and the mean capability index sampled around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub label: String,
    pub mean_capability_index: f64,
}

impl ScenarioConfig {
    pub fn new(label: impl Into<String>, mean_capability_index: f64) -> Self {
        Self {
            label: label.into(),
            mean_capability_index,
        }
    }
}

/// Closed range `[min, max]` of the uniform excess of rework over scrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PerturbationRange {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 0.04,
        }
    }
}

impl PerturbationRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 || self.min > self.max
        {
            return Err(ConfigError::InvalidPerturbationRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation configuration
// ---------------------------------------------------------------------------

/// Complete configuration of a simulation run.
///
/// # Examples
///
/// ```
/// use u_costrisk::config::{ScenarioConfig, SimulationConfig};
///
/// let config = SimulationConfig::default()
///     .with_trials(200)
///     .with_seed(7)
///     .with_scenarios(vec![
///         ScenarioConfig::new("Before", 1.0),
///         ScenarioConfig::new("After", 1.5),
///     ]);
/// assert!(config.validate().is_ok());
///
/// assert!(SimulationConfig::default().with_trials(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub cost: CostParameters,
    pub scrap_model: ScrapModel,
    /// Trials per scenario.
    pub trials: usize,
    /// Cost above which a trial counts toward the risk probability.
    pub cost_threshold: f64,
    pub scenarios: Vec<ScenarioConfig>,
    /// Standard deviation of the sampled capability index.
    pub capability_std_dev: f64,
    pub rework_perturbation: PerturbationRange,
    /// Seed for [`run_default`](crate::simulation::SimulationRunner::run_default).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cost: CostParameters::default(),
            scrap_model: ScrapModel::default(),
            trials: 1_000,
            cost_threshold: 35_000.0,
            scenarios: vec![
                ScenarioConfig::new("Before Improvement", 1.1),
                ScenarioConfig::new("After Improvement", 1.6),
            ],
            capability_std_dev: 0.15,
            rework_perturbation: PerturbationRange::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from a TOML string. Missing fields take their
    /// defaults. The result is validated.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    pub fn with_cost(mut self, cost: CostParameters) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_scrap_model(mut self, scrap_model: ScrapModel) -> Self {
        self.scrap_model = scrap_model;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_cost_threshold(mut self, cost_threshold: f64) -> Self {
        self.cost_threshold = cost_threshold;
        self
    }

    pub fn with_scenarios(mut self, scenarios: Vec<ScenarioConfig>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Appends one scenario after the existing ones.
    pub fn with_scenario(mut self, label: impl Into<String>, mean_capability_index: f64) -> Self {
        let scenario = ScenarioConfig::new(label, mean_capability_index);
        self.scenarios.push(scenario);
        self
    }

    pub fn with_capability_std_dev(mut self, std_dev: f64) -> Self {
        self.capability_std_dev = std_dev;
        self
    }

    pub fn with_rework_perturbation(mut self, min: f64, max: f64) -> Self {
        self.rework_perturbation = PerturbationRange::new(min, max);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every parameter. Called by the runner before any sampling.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidParameter`] for negative or non-finite costs,
    ///   zero trials, a non-finite threshold, a bad standard deviation, a bad
    ///   scrap model, or a blank / non-finite scenario entry
    /// - [`ConfigError::EmptyScenarios`] when no scenario is configured
    /// - [`ConfigError::DuplicateScenario`] when two scenarios share a label
    /// - [`ConfigError::InvalidPerturbationRange`] when `min > max`, `min < 0`,
    ///   or a bound is non-finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "rejected simulation config");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.check_sampling()?;
        if !self.cost_threshold.is_finite() {
            return Err(ConfigError::invalid(
                "cost_threshold",
                format!("must be finite, got {}", self.cost_threshold),
            ));
        }

        if self.scenarios.is_empty() {
            return Err(ConfigError::EmptyScenarios);
        }
        let mut seen = HashSet::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            if scenario.label.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "scenarios.label",
                    "must not be blank",
                ));
            }
            if !scenario.mean_capability_index.is_finite() {
                return Err(ConfigError::invalid(
                    "scenarios.mean_capability_index",
                    format!(
                        "scenario `{}` has non-finite mean {}",
                        scenario.label, scenario.mean_capability_index
                    ),
                ));
            }
            if !seen.insert(scenario.label.as_str()) {
                return Err(ConfigError::DuplicateScenario {
                    label: scenario.label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parameters shared by every scenario sampler: costs, scrap model,
    /// trial count, capability spread, and rework perturbation.
    pub(crate) fn check_sampling(&self) -> Result<(), ConfigError> {
        self.cost.validate()?;
        self.scrap_model.validate()?;
        if self.trials == 0 {
            return Err(ConfigError::invalid("trials", "must be at least 1"));
        }
        if !self.capability_std_dev.is_finite() || self.capability_std_dev < 0.0 {
            return Err(ConfigError::invalid(
                "capability_std_dev",
                format!(
                    "must be non-negative and finite, got {}",
                    self.capability_std_dev
                ),
            ));
        }
        self.rework_perturbation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Validation tests
    // -----------------------------------------------------------------------

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trials, 1_000);
        assert_eq!(config.cost_threshold, 35_000.0);
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[0].label, "Before Improvement");
        assert_eq!(config.scenarios[1].mean_capability_index, 1.6);
        assert!((config.rework_perturbation.midpoint() - 0.025).abs() < 1e-15);
    }

    #[test]
    fn zero_trials_rejected() {
        let err = SimulationConfig::default().with_trials(0).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { ref field, .. } if field == "trials"
        ));
    }

    #[test]
    fn empty_scenarios_rejected() {
        let err = SimulationConfig::default()
            .with_scenarios(Vec::new())
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyScenarios);
    }

    #[test]
    fn duplicate_labels_rejected() {
        let err = SimulationConfig::default()
            .with_scenario("Before Improvement", 2.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateScenario {
                label: "Before Improvement".to_string()
            }
        );
    }

    #[test]
    fn blank_label_rejected() {
        let config =
            SimulationConfig::default().with_scenarios(vec![ScenarioConfig::new("  ", 1.0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_perturbation_rejected() {
        let err = SimulationConfig::default()
            .with_rework_perturbation(0.04, 0.01)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPerturbationRange {
                min: 0.04,
                max: 0.01
            }
        );
    }

    #[test]
    fn negative_perturbation_rejected() {
        let config = SimulationConfig::default().with_rework_perturbation(-0.01, 0.02);
        assert!(config.validate().is_err());
    }

    #[test]
    fn degenerate_perturbation_accepted() {
        let config = SimulationConfig::default().with_rework_perturbation(0.025, 0.025);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_volume_rejected() {
        let config = SimulationConfig::default().with_cost(CostParameters {
            volume: -10.0,
            ..CostParameters::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_std_dev_rejected() {
        let config = SimulationConfig::default().with_capability_std_dev(-0.1);
        assert!(config.validate().is_err());
        let config = SimulationConfig::default().with_capability_std_dev(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_finite_threshold_rejected() {
        let config = SimulationConfig::default().with_cost_threshold(f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_mean_rejected() {
        let config =
            SimulationConfig::default().with_scenarios(vec![ScenarioConfig::new("A", f64::NAN)]);
        assert!(config.validate().is_err());
    }

    // -----------------------------------------------------------------------
    // TOML tests
    // -----------------------------------------------------------------------

    #[test]
    fn from_toml_partial_document() {
        let toml_str = r#"
            trials = 250
            cost_threshold = 30000.0
            seed = 11

            [cost]
            volume = 12000.0

            [scrap_model]
            kind = "normal_tail"
            floor = 0.0001

            [rework_perturbation]
            min = 0.02
            max = 0.05

            [[scenarios]]
            label = "Current"
            mean_capability_index = 1.0

            [[scenarios]]
            label = "Target"
            mean_capability_index = 1.33
        "#;
        let config = SimulationConfig::from_toml(toml_str).expect("should parse");
        assert_eq!(config.trials, 250);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.cost.volume, 12_000.0);
        // untouched cost fields keep their defaults
        assert_eq!(config.cost.unit_value, 15.0);
        assert_eq!(config.scrap_model, ScrapModel::NormalTail { floor: 0.0001 });
        assert_eq!(config.rework_perturbation, PerturbationRange::new(0.02, 0.05));
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[1].label, "Target");
        assert_eq!(config.capability_std_dev, 0.15);
    }

    #[test]
    fn from_toml_empty_is_default() {
        let config = SimulationConfig::from_toml("").expect("should parse");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn from_toml_reports_parse_error() {
        let err = SimulationConfig::from_toml("trials = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn from_toml_validates() {
        let err = SimulationConfig::from_toml("trials = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let config = SimulationConfig::default().with_seed(3).with_trials(42);
        let text = config.to_toml().expect("should serialize");
        let back = SimulationConfig::from_toml(&text).expect("should parse");
        assert_eq!(back, config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SimulationConfig::load(Path::new("/nonexistent/u-costrisk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
