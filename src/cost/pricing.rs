//! Monetary cost of scrap, rework, and inspection for one period.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed cost parameters of a production period.
///
/// All amounts are in the same currency; `volume` is units per period.
///
/// # Examples
///
/// ```
/// use u_costrisk::cost::CostParameters;
///
/// let params = CostParameters::default();
/// // No scrap, no rework: only inspection is paid.
/// assert!((params.total_cost(0.0, 0.0) - 6_000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// Units produced per period.
    pub volume: f64,
    /// Value lost per scrapped unit.
    pub unit_value: f64,
    /// Labor cost per reworked unit.
    pub rework_labor_cost: f64,
    /// Extra material cost per reworked unit.
    pub extra_material_cost: f64,
    /// Inspection cost per produced unit.
    pub inspection_cost: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            volume: 10_000.0,
            unit_value: 15.0,
            rework_labor_cost: 6.0,
            extra_material_cost: 4.0,
            inspection_cost: 0.6,
        }
    }
}

/// Per-component cost of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub scrap: f64,
    pub rework_labor: f64,
    pub extra_material: f64,
    pub inspection: f64,
}

impl CostBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.scrap + self.rework_labor + self.extra_material + self.inspection
    }
}

impl CostParameters {
    /// Splits the period cost into its components.
    pub fn breakdown(&self, scrap_rate: f64, rework_rate: f64) -> CostBreakdown {
        CostBreakdown {
            scrap: self.volume * scrap_rate * self.unit_value,
            rework_labor: self.volume * rework_rate * self.rework_labor_cost,
            extra_material: self.volume * rework_rate * self.extra_material_cost,
            inspection: self.volume * self.inspection_cost,
        }
    }

    /// Total period cost:
    ///
    /// ```text
    /// V·s·unit_value + V·r·(rework_labor + extra_material) + V·inspection
    /// ```
    pub fn total_cost(&self, scrap_rate: f64, rework_rate: f64) -> f64 {
        self.breakdown(scrap_rate, rework_rate).total()
    }

    /// Lowest cost reachable, paid even with zero scrap and rework.
    pub fn fixed_cost(&self) -> f64 {
        self.volume * self.inspection_cost
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("cost.volume", self.volume),
            ("cost.unit_value", self.unit_value),
            ("cost.rework_labor_cost", self.rework_labor_cost),
            ("cost.extra_material_cost", self.extra_material_cost),
            ("cost.inspection_cost", self.inspection_cost),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be non-negative and finite, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs_match_reference_example() {
        let params = CostParameters::default();
        let b = params.breakdown(0.0603, 0.0853);
        assert!((b.scrap - 9_045.0).abs() < 1e-6);
        assert!((b.rework_labor + b.extra_material - 8_530.0).abs() < 1e-6);
        assert!((b.inspection - 6_000.0).abs() < 1e-9);
        assert!((params.total_cost(0.0603, 0.0853) - 23_575.0).abs() < 1e-6);
    }

    #[test]
    fn breakdown_total_equals_total_cost() {
        let params = CostParameters::default();
        let b = params.breakdown(0.1, 0.13);
        assert_eq!(b.total(), params.total_cost(0.1, 0.13));
    }

    #[test]
    fn fixed_cost_is_inspection() {
        let params = CostParameters {
            volume: 500.0,
            inspection_cost: 2.0,
            ..CostParameters::default()
        };
        assert_eq!(params.fixed_cost(), 1_000.0);
        assert_eq!(params.total_cost(0.0, 0.0), 1_000.0);
    }

    #[test]
    fn validate_rejects_negative_volume() {
        let params = CostParameters {
            volume: -1.0,
            ..CostParameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { ref field, .. } if field == "cost.volume"
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let params = CostParameters {
            unit_value: f64::NAN,
            ..CostParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_volume_is_valid() {
        let params = CostParameters {
            volume: 0.0,
            ..CostParameters::default()
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.total_cost(0.5, 0.6), 0.0);
    }
}
