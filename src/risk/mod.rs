//! Risk analysis of a finished simulation.
//!
//! - [`summarize`] — mean, worst-case, and threshold-exceedance per scenario
//! - [`driver_correlations`] — Pearson correlation of cost with each input
//! - [`analyze`] — both at once

mod drivers;
mod summary;

pub use drivers::{driver_correlations, Driver, DriverCorrelation, DriverRanking};
pub use summary::{summarize, summarize_scenarios, RiskSummary, SummaryRow};

use serde::Serialize;

use crate::error::AnalysisError;
use crate::simulation::CombinedDataset;

/// Everything handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub summary: RiskSummary,
    pub drivers: DriverRanking,
}

/// Runs [`summarize`] and [`driver_correlations`] on the same dataset.
pub fn analyze(dataset: &CombinedDataset, threshold: f64) -> Result<RiskReport, AnalysisError> {
    let summary = summarize(dataset, threshold)?;
    let drivers = driver_correlations(dataset)?;
    Ok(RiskReport { summary, drivers })
}
