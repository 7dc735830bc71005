//! Multi-scenario Monte Carlo runs.
//!
//! [`SimulationRunner`] samples every configured scenario in order and
//! concatenates the results into a [`CombinedDataset`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::risk::{self, RiskReport};
use crate::sampling::{ScenarioSample, ScenarioSampler, Trial};

/// All scenario samples of a run, in configured order.
///
/// Trial order within each scenario is sampling order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedDataset {
    samples: Vec<ScenarioSample>,
}

impl CombinedDataset {
    pub fn new(samples: Vec<ScenarioSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[ScenarioSample] {
        &self.samples
    }

    /// Distinct scenario labels in first-appearance order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::with_capacity(self.samples.len());
        for s in &self.samples {
            if !labels.contains(&s.label()) {
                labels.push(s.label());
            }
        }
        labels
    }

    /// First sample carrying `label`.
    pub fn scenario(&self, label: &str) -> Option<&ScenarioSample> {
        self.samples.iter().find(|s| s.label() == label)
    }

    /// Total number of trials across all scenarios.
    pub fn len(&self) -> usize {
        self.samples.iter().map(ScenarioSample::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(ScenarioSample::is_empty)
    }

    /// Every trial with its scenario label.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Trial)> + '_ {
        self.samples
            .iter()
            .flat_map(|s| s.trials().iter().map(move |t| (s.label(), t)))
    }

    /// Total costs of every trial labelled `label`.
    pub fn costs_for(&self, label: &str) -> Vec<f64> {
        self.iter()
            .filter(|(l, _)| *l == label)
            .map(|(_, t)| t.total_cost)
            .collect()
    }

    /// One value per trial across the whole dataset.
    pub fn column(&self, f: impl Fn(&Trial) -> f64) -> Vec<f64> {
        self.iter().map(|(_, t)| f(t)).collect()
    }
}

/// Runs a validated [`SimulationConfig`].
///
/// # Examples
///
/// ```
/// use u_costrisk::config::SimulationConfig;
/// use u_costrisk::simulation::SimulationRunner;
///
/// let runner = SimulationRunner::new(SimulationConfig::default().with_trials(250)).unwrap();
/// let dataset = runner.run_seeded(42).unwrap();
/// assert_eq!(dataset.len(), 500);
/// assert_eq!(dataset.labels(), ["Before Improvement", "After Improvement"]);
///
/// let report = runner.analyze(&dataset).unwrap();
/// let before = report.summary.get("Before Improvement").unwrap();
/// let after = report.summary.get("After Improvement").unwrap();
/// assert!(after.mean_cost < before.mean_cost);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Samples every scenario from `rng`, one after another.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CombinedDataset, ConfigError> {
        let mut samples = Vec::with_capacity(self.config.scenarios.len());
        for scenario in &self.config.scenarios {
            let sampler = ScenarioSampler::new(&self.config, scenario)?;
            samples.push(sampler.sample(rng));
        }
        let dataset = CombinedDataset::new(samples);
        tracing::info!(
            scenarios = self.config.scenarios.len(),
            trials = dataset.len(),
            "simulation complete"
        );
        Ok(dataset)
    }

    /// Runs with a [`StdRng`] seeded from `seed`.
    pub fn run_seeded(&self, seed: u64) -> Result<CombinedDataset, ConfigError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run(&mut rng)
    }

    /// Runs with the configured seed, or from OS entropy when none is set.
    pub fn run_default(&self) -> Result<CombinedDataset, ConfigError> {
        match self.config.seed {
            Some(seed) => self.run_seeded(seed),
            None => self.run(&mut StdRng::from_entropy()),
        }
    }

    /// Summary of every configured scenario at the configured cost
    /// threshold, plus the driver ranking.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptyGroup`] naming each configured scenario that has
    /// no trials in `dataset`, or any error from
    /// [`driver_correlations`](risk::driver_correlations).
    pub fn analyze(&self, dataset: &CombinedDataset) -> Result<RiskReport, AnalysisError> {
        let labels: Vec<&str> = self
            .config
            .scenarios
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        let summary = risk::summarize_scenarios(dataset, &labels, self.config.cost_threshold)?;
        let drivers = risk::driver_correlations(dataset)?;
        Ok(RiskReport { summary, drivers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::risk::Driver;

    fn runner(trials: usize) -> SimulationRunner {
        SimulationRunner::new(SimulationConfig::default().with_trials(trials)).expect("valid")
    }

    #[test]
    fn invalid_config_rejected_before_sampling() {
        let err = SimulationRunner::new(SimulationConfig::default().with_scenarios(Vec::new()))
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyScenarios);
    }

    #[test]
    fn preserves_scenario_order_and_counts() {
        let config = SimulationConfig::default()
            .with_trials(40)
            .with_scenarios(vec![
                ScenarioConfig::new("Late", 1.8),
                ScenarioConfig::new("Early", 0.9),
                ScenarioConfig::new("Middle", 1.3),
            ]);
        let dataset = SimulationRunner::new(config).unwrap().run_seeded(5).unwrap();
        assert_eq!(dataset.labels(), ["Late", "Early", "Middle"]);
        assert_eq!(dataset.len(), 120);
        for s in dataset.samples() {
            assert_eq!(s.len(), 40);
        }
        let labels: Vec<&str> = dataset.iter().map(|(l, _)| l).collect();
        assert!(labels[..40].iter().all(|&l| l == "Late"));
        assert!(labels[40..80].iter().all(|&l| l == "Early"));
        assert!(labels[80..].iter().all(|&l| l == "Middle"));
    }

    #[test]
    fn analyze_empty_dataset_names_every_configured_scenario() {
        let err = runner(10).analyze(&CombinedDataset::default()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyGroup {
                labels: vec![
                    "Before Improvement".to_string(),
                    "After Improvement".to_string()
                ]
            }
        );
    }

    #[test]
    fn analyze_missing_scenario_is_empty_group() {
        let r = runner(20);
        let full = r.run_seeded(6).unwrap();
        let before = full.scenario("Before Improvement").unwrap().clone();
        let partial = CombinedDataset::new(vec![before]);
        let err = r.analyze(&partial).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyGroup {
                labels: vec!["After Improvement".to_string()]
            }
        );
    }

    #[test]
    fn seeded_runs_are_identical() {
        let r = runner(100);
        assert_eq!(r.run_seeded(99).unwrap(), r.run_seeded(99).unwrap());
    }

    #[test]
    fn run_default_uses_configured_seed() {
        let config = SimulationConfig::default().with_trials(30).with_seed(8);
        let r = SimulationRunner::new(config).unwrap();
        assert_eq!(r.run_default().unwrap(), r.run_seeded(8).unwrap());
    }

    #[test]
    fn run_accepts_trait_object_rng() {
        let r = runner(10);
        let mut rng = StdRng::seed_from_u64(1);
        let dyn_rng: &mut dyn rand::RngCore = &mut rng;
        assert_eq!(r.run(dyn_rng).unwrap().len(), 20);
    }

    #[test]
    fn scenario_lookup_and_columns() {
        let dataset = runner(25).run_seeded(3).unwrap();
        let before = dataset.scenario("Before Improvement").unwrap();
        assert_eq!(before.len(), 25);
        assert!(dataset.scenario("Missing").is_none());
        assert_eq!(dataset.costs_for("After Improvement").len(), 25);
        assert_eq!(dataset.column(|t| t.scrap_rate).len(), 50);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn improvement_lowers_cost_and_risk() {
        let r = runner(1_000);
        let dataset = r.run_seeded(2024).unwrap();
        let report = r.analyze(&dataset).unwrap();
        let before = report.summary.get("Before Improvement").unwrap();
        let after = report.summary.get("After Improvement").unwrap();

        assert!(after.mean_cost < before.mean_cost);
        assert!(after.worst_case <= before.worst_case);
        assert!(after.risk_probability <= before.risk_probability);
        // E[exp(-2.5·cpk)] under cpk ~ N(μ, 0.15): ~25.6k before, ~13.4k after.
        assert!((before.mean_cost - 25_600.0).abs() < 1_000.0, "{}", before.mean_cost);
        assert!((after.mean_cost - 13_400.0).abs() < 1_000.0, "{}", after.mean_cost);
        assert!(before.risk_probability > 0.0);
    }

    #[test]
    fn drivers_rank_capability_negative_and_scrap_positive() {
        let r = runner(500);
        let dataset = r.run_seeded(17).unwrap();
        let report = r.analyze(&dataset).unwrap();
        let ranking = &report.drivers;
        assert_eq!(ranking.entries()[0].driver, Driver::CapabilityIndex);
        assert!(ranking.coefficient(Driver::CapabilityIndex).unwrap() < -0.8);
        assert!(ranking.coefficient(Driver::ScrapRate).unwrap() > 0.9);
        assert!(ranking.coefficient(Driver::ReworkRate).unwrap() > 0.9);
    }

    #[test]
    fn every_trial_satisfies_invariants() {
        let r = runner(300);
        let dataset = r.run_seeded(11).unwrap();
        let fixed = r.config().cost.fixed_cost();
        for (_, t) in dataset.iter() {
            assert!(t.rework_rate >= t.scrap_rate);
            assert!(t.scrap_rate > 0.0 && t.scrap_rate <= 1.0);
            assert!(t.total_cost >= fixed);
        }
    }
}
