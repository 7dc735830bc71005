//! Monte Carlo sampling of one scenario.
//!
//! # Algorithm
//!
//! For each trial:
//!
//! 1. cpk ~ Normal(μ, σ), modelling process drift around the nominal
//!    capability.
//! 2. scrap = ScrapModel(cpk).
//! 3. rework = min(scrap + u, 1) with u ~ Uniform[min, max], u ≥ 0, so
//!    reworked units always include the scrapped ones.
//! 4. cost = CostParameters(scrap, rework).

use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{ScenarioSample, Trial};
use crate::config::{ScenarioConfig, SimulationConfig};
use crate::cost::{CostParameters, ScrapModel};
use crate::error::ConfigError;

/// Draws the trials of a single scenario.
///
/// The random source is passed to [`sample`](Self::sample), so a seeded
/// generator reproduces the exact same trial sequence.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_costrisk::config::SimulationConfig;
/// use u_costrisk::sampling::ScenarioSampler;
///
/// let config = SimulationConfig::default().with_trials(100);
/// let sampler = ScenarioSampler::new(&config, &config.scenarios[0]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let sample = sampler.sample(&mut rng);
/// assert_eq!(sample.len(), 100);
/// assert!(sample.trials().iter().all(|t| t.rework_rate >= t.scrap_rate));
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioSampler<'a> {
    label: &'a str,
    trials: usize,
    cost: &'a CostParameters,
    scrap_model: &'a ScrapModel,
    capability: Normal<f64>,
    perturbation: Uniform<f64>,
}

impl<'a> ScenarioSampler<'a> {
    /// Builds a sampler for `scenario`, sharing every other parameter with
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the cost parameters, the trial count, the
    /// standard deviation, the perturbation range, the scrap model, or the
    /// scenario mean is invalid.
    pub fn new(
        config: &'a SimulationConfig,
        scenario: &'a ScenarioConfig,
    ) -> Result<Self, ConfigError> {
        config.check_sampling()?;
        if !scenario.mean_capability_index.is_finite() {
            return Err(ConfigError::invalid(
                "scenarios.mean_capability_index",
                format!("must be finite, got {}", scenario.mean_capability_index),
            ));
        }
        let capability = Normal::new(scenario.mean_capability_index, config.capability_std_dev)
            .map_err(|e| ConfigError::invalid("capability_std_dev", e.to_string()))?;
        let range = config.rework_perturbation;
        let perturbation = Uniform::new_inclusive(range.min, range.max);

        Ok(Self {
            label: &scenario.label,
            trials: config.trials,
            cost: &config.cost,
            scrap_model: &config.scrap_model,
            capability,
            perturbation,
        })
    }

    pub fn label(&self) -> &str {
        self.label
    }

    /// Mean of the sampled capability index.
    pub fn mean_capability_index(&self) -> f64 {
        self.capability.mean()
    }

    /// Derives one trial from an already drawn capability index and rework
    /// excess.
    pub fn trial_for(&self, capability_index: f64, rework_excess: f64) -> Trial {
        let scrap_rate = self.scrap_model.scrap_rate(capability_index);
        let rework_rate = (scrap_rate + rework_excess).clamp(scrap_rate, 1.0);
        Trial {
            capability_index,
            scrap_rate,
            rework_rate,
            total_cost: self.cost.total_cost(scrap_rate, rework_rate),
        }
    }

    /// Draws `trials` trials.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScenarioSample {
        let mut trials = Vec::with_capacity(self.trials);
        let mut capped = 0_usize;
        for _ in 0..self.trials {
            let cpk = self.capability.sample(rng);
            let excess = self.perturbation.sample(rng);
            let trial = self.trial_for(cpk, excess);
            if trial.rework_rate < trial.scrap_rate + excess {
                capped += 1;
            }
            trials.push(trial);
        }

        if capped > 0 {
            tracing::debug!(
                scenario = self.label,
                capped,
                "rework rate capped at 1.0"
            );
        }
        tracing::debug!(
            scenario = self.label,
            trials = self.trials,
            mean_cpk = self.capability.mean(),
            "sampled scenario"
        );

        ScenarioSample::new(self.label, trials)
    }
}
