// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Categorical Sampler

//! Weighted categorical sampling over an ordered outcome table.
//!
//! A single uniform sample `u ∈ [0, 1)` is walked along the running
//! cumulative weight; the first outcome whose cumulative weight exceeds `u`
//! wins. Table order is the tie-break. Any weight left over below 1 is the
//! implicit miss.
//!
//! ```text
//! [SSR 0.01][SR 0.05][   R 0.20   ][          N 0.74          ]
//! 0       0.01     0.06          0.26                          1.0
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::RandomSource;
use crate::types::probability_sum;

// ─── WeightedOutcome ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcome {
    pub label: String,
    pub weight: f64,
    /// Payout or value attached to the outcome, if any.
    #[serde(default)]
    pub magnitude: Option<f64>,
}

impl WeightedOutcome {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self { label: label.into(), weight, magnitude: None }
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }
}

// ─── Draw ───────────────────────────────────────────────────────────────────

/// Result of one sample: an index into the table, or the implicit miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Draw {
    Hit(usize),
    Miss,
}

impl Draw {
    pub fn index(&self) -> Option<usize> {
        match self {
            Draw::Hit(i) => Some(*i),
            Draw::Miss => None,
        }
    }

    pub fn is_hit(&self, index: usize) -> bool {
        *self == Draw::Hit(index)
    }
}

// ─── DistributionTable ──────────────────────────────────────────────────────

/// Validated, ordered outcome table with `0 ≤ Σweight ≤ 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightedOutcome>", into = "Vec<WeightedOutcome>")]
pub struct DistributionTable {
    outcomes: Vec<WeightedOutcome>,
    total_weight: f64,
}

impl DistributionTable {
    pub fn new(outcomes: Vec<WeightedOutcome>) -> Result<Self, ConfigError> {
        if outcomes.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for o in &outcomes {
            if !o.weight.is_finite() || !(0.0..=1.0).contains(&o.weight) {
                return Err(ConfigError::WeightOutOfRange {
                    label: o.label.clone(),
                    weight: o.weight,
                });
            }
            if o.magnitude.is_some_and(|m| !m.is_finite()) {
                return Err(ConfigError::NonFiniteParameter("magnitude"));
            }
        }
        let total_weight = probability_sum(outcomes.iter().map(|o| o.weight))
            .map_err(ConfigError::WeightSumExceedsOne)?;
        Ok(Self { outcomes, total_weight })
    }

    /// Build from `(label, weight)` pairs.
    pub fn from_weights(pairs: &[(&str, f64)]) -> Result<Self, ConfigError> {
        Self::new(pairs.iter().map(|&(l, w)| WeightedOutcome::new(l, w)).collect())
    }

    /// First-match-wins walk of the cumulative weights.
    pub fn sample(&self, u: f64) -> Draw {
        let mut cumulative = 0.0;
        for (i, outcome) in self.outcomes.iter().enumerate() {
            cumulative += outcome.weight;
            if u < cumulative {
                return Draw::Hit(i);
            }
        }
        Draw::Miss
    }

    pub fn sample_from<R: RandomSource>(&self, source: &mut R) -> Draw {
        self.sample(source.next_unit())
    }

    pub fn outcomes(&self) -> &[WeightedOutcome] {
        &self.outcomes
    }

    pub fn get(&self, index: usize) -> Option<&WeightedOutcome> {
        self.outcomes.get(index)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Probability of the implicit miss, `1 − Σweight` floored at zero.
    pub fn miss_probability(&self) -> f64 {
        (1.0 - self.total_weight).max(0.0)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.outcomes.iter().position(|o| o.label == label)
    }

    pub fn label(&self, draw: Draw) -> Option<&str> {
        draw.index().and_then(|i| self.outcomes.get(i)).map(|o| o.label.as_str())
    }

    pub fn magnitude(&self, draw: Draw) -> Option<f64> {
        draw.index().and_then(|i| self.outcomes.get(i)).and_then(|o| o.magnitude)
    }

    /// Theoretical mean magnitude per draw, `Σ weight · magnitude`.
    pub fn expected_magnitude(&self) -> f64 {
        self.outcomes
            .iter()
            .map(|o| o.weight * o.magnitude.unwrap_or(0.0))
            .sum()
    }
}

impl TryFrom<Vec<WeightedOutcome>> for DistributionTable {
    type Error = ConfigError;
    fn try_from(outcomes: Vec<WeightedOutcome>) -> Result<Self, Self::Error> {
        Self::new(outcomes)
    }
}

impl From<DistributionTable> for Vec<WeightedOutcome> {
    fn from(table: DistributionTable) -> Self {
        table.outcomes
    }
}
