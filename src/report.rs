//! Data preparation for the reporting layer.
//!
//! Nothing here draws. The functions shape a finished run into what a
//! renderer needs: a fixed-precision text table, overlaid cost histograms
//! sharing one set of bin edges, and tornado chart bars.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::risk::{DriverRanking, RiskSummary};
use crate::simulation::CombinedDataset;

/// Default histogram resolution.
pub const DEFAULT_BINS: usize = 40;

/// Renders the summary as a text table rounded to two decimals.
///
/// # Examples
///
/// ```
/// use u_costrisk::config::SimulationConfig;
/// use u_costrisk::report::summary_table;
/// use u_costrisk::simulation::SimulationRunner;
///
/// let runner = SimulationRunner::new(SimulationConfig::default().with_trials(50)).unwrap();
/// let report = runner.analyze(&runner.run_seeded(1).unwrap()).unwrap();
/// let table = summary_table(&report.summary);
/// assert!(table.contains("risk_probability"));
/// assert!(table.contains("After Improvement"));
/// ```
pub fn summary_table(summary: &RiskSummary) -> String {
    const HEADERS: [&str; 4] = ["mean_cost", "worst_case", "risk_probability", "p95_cost"];

    let label_width = summary
        .rows()
        .iter()
        .map(|r| r.scenario.chars().count())
        .chain(std::iter::once("scenario".len()))
        .max()
        .unwrap_or(0);

    let cells: Vec<[String; 4]> = summary
        .rows()
        .iter()
        .map(|r| {
            [
                format!("{:.2}", r.mean_cost),
                format!("{:.2}", r.worst_case),
                format!("{:.2}", r.risk_probability),
                format!("{:.2}", r.p95_cost),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::from("=== COST SIMULATION SUMMARY ===\n");
    out.push_str(&format!("threshold: {:.2}\n\n", summary.threshold));
    out.push_str(&format!("{:<label_width$}", "scenario"));
    for (h, w) in HEADERS.iter().zip(widths) {
        out.push_str(&format!("  {h:>w$}"));
    }
    out.push('\n');
    for (row, cells) in summary.rows().iter().zip(&cells) {
        out.push_str(&format!("{:<label_width$}", row.scenario));
        for (cell, w) in cells.iter().zip(widths) {
            out.push_str(&format!("  {cell:>w$}"));
        }
        out.push('\n');
    }
    out
}

/// Bin counts of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostHistogram {
    pub scenario: String,
    /// Count per bin, `edges.len() - 1` entries.
    pub counts: Vec<usize>,
}

/// Per-scenario histograms over a common set of bin edges, with the
/// threshold marker position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostHistograms {
    /// Bin edges (length = bins + 1).
    pub edges: Vec<f64>,
    pub bin_width: f64,
    /// Where the vertical threshold line goes.
    pub threshold: f64,
    pub series: Vec<CostHistogram>,
}

/// Bins every scenario's total cost over the pooled cost range.
///
/// Shared edges let the histograms be overlaid directly. `bins` of zero is
/// treated as one. When every cost is identical the range is widened by
/// half a unit on each side.
///
/// # Errors
///
/// [`AnalysisError::EmptyDataset`] if the dataset has no finite cost.
pub fn cost_histograms(
    dataset: &CombinedDataset,
    bins: usize,
    threshold: f64,
) -> Result<CostHistograms, AnalysisError> {
    let n_bins = bins.max(1);
    let costs: Vec<f64> = dataset
        .column(|t| t.total_cost)
        .into_iter()
        .filter(|c| c.is_finite())
        .collect();

    let mut min_val = costs
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(AnalysisError::EmptyDataset)?;
    let mut max_val = costs
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(AnalysisError::EmptyDataset)?;
    if max_val - min_val < 1e-300 {
        min_val -= 0.5;
        max_val += 0.5;
    }

    let bin_width = (max_val - min_val) / n_bins as f64;
    let edges: Vec<f64> = (0..=n_bins)
        .map(|i| min_val + i as f64 * bin_width)
        .collect();

    let series = dataset
        .labels()
        .into_iter()
        .map(|label| {
            let mut counts = vec![0_usize; n_bins];
            for c in dataset.costs_for(label).into_iter().filter(|c| c.is_finite()) {
                let bin = ((c - min_val) / bin_width).floor() as usize;
                counts[bin.min(n_bins - 1)] += 1; // max lands in the last bin
            }
            CostHistogram {
                scenario: label.to_string(),
                counts,
            }
        })
        .collect();

    Ok(CostHistograms {
        edges,
        bin_width,
        threshold,
        series,
    })
}

/// One bar of a tornado chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TornadoBar {
    pub label: &'static str,
    pub correlation: f64,
}

/// Tornado bars, longest first.
pub fn tornado(ranking: &DriverRanking) -> Vec<TornadoBar> {
    ranking
        .by_magnitude()
        .into_iter()
        .map(|e| TornadoBar {
            label: e.driver.name(),
            correlation: e.coefficient,
        })
        .collect()
}
