//! Scenario sampling.
//!
//! - [`ScenarioSampler`] — draws the trials of one scenario
//! - [`ScenarioSample`] — the labelled, ordered trial table it produces
//! - [`Trial`] — one simulated period

mod sampler;
mod trial;

pub use sampler::ScenarioSampler;
pub use trial::{ScenarioSample, Trial};
