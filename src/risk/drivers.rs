//! Sensitivity of total cost to each sampled input.
//!
//! Pearson correlation of total cost against every driver across the whole
//! combined dataset (all scenarios pooled), the data behind a tornado chart.
//!
//! # References
//!
//! Pearson (1895). "Note on regression and inheritance in the case of
//! two parents". Proceedings of the Royal Society of London, 58, 240–242.

use std::fmt;

use serde::Serialize;
use u_numflow::{special, stats};

use crate::error::AnalysisError;
use crate::sampling::Trial;
use crate::simulation::CombinedDataset;

/// Sampled input whose influence on total cost is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    CapabilityIndex,
    ScrapRate,
    ReworkRate,
}

impl Driver {
    pub const ALL: [Driver; 3] = [Driver::CapabilityIndex, Driver::ScrapRate, Driver::ReworkRate];

    /// Display name used on chart axes.
    pub fn name(&self) -> &'static str {
        match self {
            Driver::CapabilityIndex => "Cpk",
            Driver::ScrapRate => "Scrap Rate",
            Driver::ReworkRate => "Rework Rate",
        }
    }

    /// Reads this driver's value from a trial.
    pub fn value(&self, trial: &Trial) -> f64 {
        match self {
            Driver::CapabilityIndex => trial.capability_index,
            Driver::ScrapRate => trial.scrap_rate,
            Driver::ReworkRate => trial.rework_rate,
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Correlation of one driver with total cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriverCorrelation {
    pub driver: Driver,
    /// Pearson r in [-1, 1].
    pub coefficient: f64,
    /// Two-tailed p-value for H₀: ρ = 0. `None` with fewer than 3 trials.
    pub p_value: Option<f64>,
    /// Number of trials used.
    pub n: usize,
}

/// Driver correlations sorted ascending by coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRanking {
    entries: Vec<DriverCorrelation>,
}

impl DriverRanking {
    /// Entries in ascending coefficient order.
    pub fn entries(&self) -> &[DriverCorrelation] {
        &self.entries
    }

    pub fn get(&self, driver: Driver) -> Option<&DriverCorrelation> {
        self.entries.iter().find(|e| e.driver == driver)
    }

    pub fn coefficient(&self, driver: Driver) -> Option<f64> {
        self.get(driver).map(|e| e.coefficient)
    }

    /// Entries in descending |coefficient| order (tornado order).
    pub fn by_magnitude(&self) -> Vec<DriverCorrelation> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
        sorted
    }

    /// Driver with the largest |coefficient|.
    pub fn strongest(&self) -> Option<&DriverCorrelation> {
        self.entries
            .iter()
            .max_by(|a, b| a.coefficient.abs().total_cmp(&b.coefficient.abs()))
    }
}

/// Correlates total cost with every [`Driver`] over the whole dataset.
///
/// # Errors
///
/// [`AnalysisError::UndefinedCorrelation`] if there are fewer than two
/// trials, a value is non-finite, or either series has zero variance.
///
/// # Examples
///
/// ```
/// use u_costrisk::config::SimulationConfig;
/// use u_costrisk::risk::{driver_correlations, Driver};
/// use u_costrisk::simulation::SimulationRunner;
///
/// let runner = SimulationRunner::new(SimulationConfig::default().with_trials(300)).unwrap();
/// let dataset = runner.run_seeded(1).unwrap();
/// let ranking = driver_correlations(&dataset).unwrap();
///
/// // Higher capability means lower cost.
/// assert!(ranking.coefficient(Driver::CapabilityIndex).unwrap() < 0.0);
/// assert!(ranking.coefficient(Driver::ScrapRate).unwrap() > 0.9);
/// ```
pub fn driver_correlations(dataset: &CombinedDataset) -> Result<DriverRanking, AnalysisError> {
    let costs = dataset.column(|t| t.total_cost);
    let mut entries = Vec::with_capacity(Driver::ALL.len());
    for driver in Driver::ALL {
        let values = dataset.column(|t| driver.value(t));
        let (coefficient, p_value) = pearson(&values, &costs).map_err(|reason| {
            AnalysisError::UndefinedCorrelation {
                driver,
                reason: reason.to_string(),
            }
        })?;
        entries.push(DriverCorrelation {
            driver,
            coefficient,
            p_value,
            n: costs.len(),
        });
    }
    entries.sort_by(|a, b| a.coefficient.total_cmp(&b.coefficient));
    Ok(DriverRanking { entries })
}

/// Pearson r = cov(x,y) / (σ_x · σ_y) with a t-test p-value,
/// t = r·√(n-2) / √(1-r²), df = n-2.
fn pearson(x: &[f64], y: &[f64]) -> Result<(f64, Option<f64>), &'static str> {
    let n = x.len();
    if n != y.len() {
        return Err("series differ in length");
    }
    if n < 2 {
        return Err("at least two trials are required");
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err("series contain non-finite values");
    }
    if is_constant(x) {
        return Err("driver has zero variance");
    }
    if is_constant(y) {
        return Err("total cost has zero variance");
    }

    let cov = stats::covariance(x, y).ok_or("covariance undefined")?;
    let sx = stats::std_dev(x).ok_or("driver variance undefined")?;
    let sy = stats::std_dev(y).ok_or("cost variance undefined")?;
    if sx < 1e-300 || sy < 1e-300 {
        return Err("variance too small to correlate");
    }

    let r = (cov / (sx * sy)).clamp(-1.0, 1.0);
    Ok((r, p_value(r, n)))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn p_value(r: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    let df = (n - 2) as f64;
    let r2 = r * r;
    if r2 >= 1.0 - 1e-15 {
        return Some(0.0);
    }
    let t = r * (df / (1.0 - r2)).sqrt();
    Some((2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0))
}
