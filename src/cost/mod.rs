//! Cost model.
//!
//! Pure functions turning a capability index into a scrap rate
//! ([`ScrapModel`]) and a pair of scrap/rework rates into a period cost
//! ([`CostParameters`]). Nothing here holds state or can fail.

mod pricing;
mod scrap;

pub use pricing::{CostBreakdown, CostParameters};
pub use scrap::{ScrapModel, DEFAULT_DECAY, DEFAULT_FLOOR};
