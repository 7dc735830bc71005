//! Per-scenario cost statistics.

use serde::Serialize;
use u_numflow::stats;

use crate::error::AnalysisError;
use crate::simulation::CombinedDataset;

/// Aggregate cost statistics of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub scenario: String,
    /// Number of trials in the group.
    pub trials: usize,
    /// Arithmetic mean of total cost.
    pub mean_cost: f64,
    /// Maximum total cost.
    pub worst_case: f64,
    /// Fraction of trials with total cost strictly above the threshold.
    pub risk_probability: f64,
    /// 95th percentile of total cost.
    pub p95_cost: f64,
}

/// Summary rows in dataset scenario order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub threshold: f64,
    rows: Vec<SummaryRow>,
}

impl RiskSummary {
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn get(&self, scenario: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.scenario == scenario)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summarizes every scenario present in `dataset`.
///
/// # Errors
///
/// - [`AnalysisError::EmptyDataset`] if the dataset names no scenario
/// - [`AnalysisError::EmptyGroup`] listing each scenario with no trials
/// - [`AnalysisError::InvalidThreshold`] if `threshold` is not finite
///
/// # Examples
///
/// ```
/// use u_costrisk::risk::summarize;
/// use u_costrisk::sampling::{ScenarioSample, Trial};
/// use u_costrisk::simulation::CombinedDataset;
///
/// let trial = |cost| Trial {
///     capability_index: 1.0,
///     scrap_rate: 0.08,
///     rework_rate: 0.1,
///     total_cost: cost,
/// };
/// let dataset = CombinedDataset::new(vec![ScenarioSample::new(
///     "Before",
///     vec![trial(10.0), trial(30.0), trial(50.0)],
/// )]);
///
/// let summary = summarize(&dataset, 20.0).unwrap();
/// let row = summary.get("Before").unwrap();
/// assert_eq!(row.mean_cost, 30.0);
/// assert_eq!(row.worst_case, 50.0);
/// assert!((row.risk_probability - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn summarize(dataset: &CombinedDataset, threshold: f64) -> Result<RiskSummary, AnalysisError> {
    let labels = dataset.labels();
    if labels.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    summarize_scenarios(dataset, &labels, threshold)
}

/// Summarizes the requested scenarios, in the order given.
///
/// Every requested label without trials is reported in one
/// [`AnalysisError::EmptyGroup`].
pub fn summarize_scenarios(
    dataset: &CombinedDataset,
    scenarios: &[&str],
    threshold: f64,
) -> Result<RiskSummary, AnalysisError> {
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidThreshold { threshold });
    }

    let mut rows = Vec::with_capacity(scenarios.len());
    let mut empty = Vec::new();
    for &label in scenarios {
        let costs = dataset.costs_for(label);
        match summarize_costs(label, &costs, threshold) {
            Some(row) => rows.push(row),
            None => empty.push(label.to_string()),
        }
    }

    if !empty.is_empty() {
        return Err(AnalysisError::EmptyGroup { labels: empty });
    }
    Ok(RiskSummary { threshold, rows })
}

fn summarize_costs(label: &str, costs: &[f64], threshold: f64) -> Option<SummaryRow> {
    if costs.is_empty() {
        return None;
    }
    let n = costs.len();
    let mean_cost = stats::mean(costs)?;
    let worst_case = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exceeding = costs.iter().filter(|&&c| c > threshold).count();
    // single-trial groups have no interpolated quantile
    let p95_cost = stats::quantile(costs, 0.95).unwrap_or(worst_case);

    Some(SummaryRow {
        scenario: label.to_string(),
        trials: n,
        mean_cost,
        worst_case,
        risk_probability: exceeding as f64 / n as f64,
        p95_cost,
    })
}
