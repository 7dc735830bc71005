//! # u-costrisk
//!
//! Monte Carlo estimation of scrap and rework cost risk driven by process
//! capability (Cpk).
//!
//! A capability index is sampled around each scenario's nominal value,
//! mapped to a scrap rate by an engineering heuristic, padded into a rework
//! rate, and priced. Repeating this for every configured scenario yields a
//! combined dataset from which per-scenario risk statistics and cost driver
//! correlations are derived.
//!
//! ## Modules
//!
//! - [`cost`] — Cpk → scrap rate heuristics and period cost arithmetic
//! - [`sampling`] — Per-scenario Monte Carlo sampling
//! - [`simulation`] — Multi-scenario runs and the combined dataset
//! - [`risk`] — Summary statistics and driver correlations
//! - [`report`] — Text table, histogram, and tornado data for renderers
//! - [`config`] — Simulation parameters with defaults and TOML loading
//! - [`error`] — Configuration and analysis errors
//!
//! ## Example
//!
//! ```
//! use u_costrisk::config::SimulationConfig;
//! use u_costrisk::simulation::SimulationRunner;
//!
//! let config = SimulationConfig::default().with_trials(500).with_seed(42);
//! let runner = SimulationRunner::new(config).unwrap();
//! let dataset = runner.run_default().unwrap();
//! let report = runner.analyze(&dataset).unwrap();
//!
//! for row in report.summary.rows() {
//!     assert!((0.0..=1.0).contains(&row.risk_probability));
//! }
//! ```
//!
//! ## Determinism
//!
//! Randomness is always passed in. The same seed and configuration
//! reproduce the same trials bit for bit.

pub mod config;
pub mod cost;
pub mod error;
pub mod report;
pub mod risk;
pub mod sampling;
pub mod simulation;

pub use error::{AnalysisError, ConfigError, Error, Result};
