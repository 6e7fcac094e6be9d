// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Cumulative Hazard Calculator

//! "Rare" annual events compounded over long horizons.
//!
//! The aggregate is the plain sum of the per-event annual probabilities (an
//! approximation that holds for small values), and
//! `cumulative(n) = 1 − (1 − a)^n`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::probability_sum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub name: String,
    /// Probability per year, as a fraction in `[0, 1]`.
    pub annual_probability: f64,
}

impl Hazard {
    pub fn new(name: impl Into<String>, annual_probability: f64) -> Self {
        Self { name: name.into(), annual_probability }
    }

    /// Build from a percentage per year, the unit the presets are quoted in.
    pub fn from_percent(name: impl Into<String>, percent_per_year: f64) -> Self {
        Self::new(name, percent_per_year / 100.0)
    }
}

/// One row of a horizon table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub years: u64,
    pub probability: f64,
    pub percent: f64,
}

/// Years the default checkpoint table reports.
pub const DEFAULT_CHECKPOINTS: [u64; 3] = [100, 1_000, 10_000];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardModel {
    hazards: Vec<Hazard>,
    aggregate_annual: f64,
}

impl HazardModel {
    pub fn new(hazards: Vec<Hazard>) -> Result<Self, ConfigError> {
        for h in &hazards {
            let p = h.annual_probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::ProbabilityOutOfRange { name: h.name.clone(), p });
            }
        }
        let aggregate_annual = probability_sum(hazards.iter().map(|h| h.annual_probability))
            .map_err(ConfigError::AggregateExceedsOne)?;
        Ok(Self { hazards, aggregate_annual })
    }

    /// Cosmic-catastrophe table from the "it won't happen to us" page.
    pub fn earth_preset() -> Self {
        let hazards = vec![
            Hazard::from_percent("meteor impact", 0.0001),
            Hazard::from_percent("gamma-ray burst", 0.00001),
            Hazard::from_percent("solar anomaly", 0.001),
            Hazard::from_percent("nearby supernova", 0.00005),
            Hazard::from_percent("asteroid belt collapse", 0.0002),
        ];
        let aggregate_annual = hazards.iter().map(|h| h.annual_probability).sum();
        Self { hazards, aggregate_annual }
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn aggregate_annual(&self) -> f64 {
        self.aggregate_annual
    }

    /// Probability that at least one event happens within `years`.
    pub fn cumulative(&self, years: u64) -> f64 {
        if years == 0 || self.aggregate_annual == 0.0 {
            return 0.0;
        }
        if self.aggregate_annual >= 1.0 {
            return 1.0;
        }
        // 1 − (1 − a)^n without the cancellation for tiny a
        -(years as f64 * (-self.aggregate_annual).ln_1p()).exp_m1()
    }

    pub fn cumulative_percent(&self, years: u64) -> f64 {
        self.cumulative(years) * 100.0
    }

    /// Smallest horizon at which the cumulative probability reaches
    /// `target`. `None` if it never does.
    pub fn years_to_reach(&self, target: f64) -> Option<u64> {
        if !target.is_finite() || target > 1.0 {
            return None;
        }
        if target <= 0.0 {
            return Some(0);
        }
        if self.aggregate_annual == 0.0 || (target >= 1.0 && self.aggregate_annual < 1.0) {
            return None;
        }
        if self.aggregate_annual >= 1.0 {
            return Some(1);
        }
        let n = ((-target).ln_1p() / (-self.aggregate_annual).ln_1p()).ceil();
        if !n.is_finite() || n >= u64::MAX as f64 {
            return None;
        }
        // the quotient can round either way; settle on the exact boundary
        let mut years = n.max(1.0) as u64;
        while self.cumulative(years) < target {
            years += 1;
        }
        while years > 1 && self.cumulative(years - 1) >= target {
            years -= 1;
        }
        Some(years)
    }

    pub fn checkpoints(&self, years: &[u64]) -> Vec<Checkpoint> {
        years
            .iter()
            .map(|&y| {
                let probability = self.cumulative(y);
                Checkpoint { years: y, probability, percent: probability * 100.0 }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_years_is_zero() {
        let m = HazardModel::earth_preset();
        assert_eq!(m.cumulative(0), 0.0);
    }

    #[test]
    fn preset_aggregate_is_sum_of_percentages() {
        let m = HazardModel::earth_preset();
        assert!((m.aggregate_annual() - 0.0000136).abs() < 1e-15);
        assert_eq!(m.hazards().len(), 5);
    }

    #[test]
    fn cumulative_matches_closed_form() {
        let m = HazardModel::new(vec![Hazard::new("coin", 0.5)]).unwrap();
        assert!((m.cumulative(1) - 0.5).abs() < 1e-12);
        assert!((m.cumulative(3) - 0.875).abs() < 1e-12);

        let m = HazardModel::earth_preset();
        let naive = 1.0 - (1.0 - m.aggregate_annual()).powi(10_000);
        assert!((m.cumulative(10_000) - naive).abs() < 1e-9);
    }

    #[test]
    fn strictly_increasing_and_approaching_one() {
        let m = HazardModel::new(vec![Hazard::new("a", 0.001), Hazard::new("b", 0.002)]).unwrap();
        let mut prev = 0.0;
        for n in 1..2_000 {
            let c = m.cumulative(n);
            assert!(c > prev, "cumulative({n}) = {c} not above {prev}");
            prev = c;
        }
        assert!(m.cumulative(100_000) > 0.999_999);
    }

    #[test]
    fn checkpoints_report_percentages() {
        let m = HazardModel::earth_preset();
        let rows = m.checkpoints(&DEFAULT_CHECKPOINTS);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].percent < rows[1].percent && rows[1].percent < rows[2].percent);
        assert!((rows[2].percent - 12.72).abs() < 0.01, "10,000 years: {}", rows[2].percent);
    }

    #[test]
    fn years_to_reach_is_the_first_crossing() {
        let m = HazardModel::new(vec![Hazard::new("coin", 0.5)]).unwrap();
        assert_eq!(m.years_to_reach(0.49), Some(1));
        assert_eq!(m.years_to_reach(0.9), Some(4));
        assert_eq!(m.years_to_reach(0.0), Some(0));
        assert_eq!(m.years_to_reach(1.0), None);

        let none = HazardModel::new(vec![]).unwrap();
        assert_eq!(none.cumulative(1_000), 0.0);
        assert_eq!(none.years_to_reach(0.1), None);
    }

    #[test]
    fn rejects_invalid_probabilities() {
        assert!(matches!(
            HazardModel::new(vec![Hazard::new("bad", 1.5)]),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));
        assert!(matches!(
            HazardModel::new(vec![Hazard::new("a", 0.7), Hazard::new("b", 0.6)]),
            Err(ConfigError::AggregateExceedsOne(_))
        ));
    }

    #[test]
    fn aggregate_shares_the_table_rounding_rule() {
        let m = HazardModel::new(vec![Hazard::new("a", 0.1), Hazard::new("b", 0.2), Hazard::new("c", 0.7)]).unwrap();
        assert_eq!(m.aggregate_annual(), 1.0);
        assert_eq!(m.cumulative(1), 1.0);

        assert!(matches!(
            HazardModel::new(vec![Hazard::new("a", 0.5), Hazard::new("b", 0.5 + 5e-10)]),
            Err(ConfigError::AggregateExceedsOne(_))
        ));
    }
}
