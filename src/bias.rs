// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Chi-Square Bias Detector

//! Goodness-of-fit against a uniform null hypothesis.
//!
//! `E = T / k`, `χ² = Σ (O_i − E)² / E`, judged against the 5 % critical
//! value for `k − 1` degrees of freedom. The critical values are a fixed
//! lookup, so only category counts with a tabulated entry are accepted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper 5 % points of χ² for 1..=35 degrees of freedom.
const CRITICAL_5PCT: [f64; 35] = [
    3.841, 5.991, 7.815, 9.488, 11.070, 12.592, 14.067, 15.507, 16.919, 18.307, //
    19.675, 21.026, 22.362, 23.685, 24.996, 26.296, 27.587, 28.869, 30.144, 31.410, //
    32.671, 33.924, 35.172, 36.415, 37.652, 38.885, 40.113, 41.337, 42.557, 43.773, //
    44.985, 46.194, 47.400, 48.602, 49.802,
];

/// 5 % critical value for `df` degrees of freedom, if tabulated.
pub fn critical_value_5pct(df: usize) -> Option<f64> {
    df.checked_sub(1).and_then(|i| CRITICAL_5PCT.get(i)).copied()
}

// ─── Verdict ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasVerdict {
    /// No observations yet.
    InsufficientData,
    Consistent,
    Biased,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareReport {
    pub total: u64,
    pub degrees_of_freedom: usize,
    pub critical_value: f64,
    /// `None` when there are no observations.
    pub expected: Option<f64>,
    pub chi_square: Option<f64>,
    pub verdict: BiasVerdict,
}

impl ChiSquareReport {
    pub fn is_biased(&self) -> bool {
        self.verdict == BiasVerdict::Biased
    }
}

// ─── FrequencyTable ─────────────────────────────────────────────────────────

/// Observed counts per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    labels: Vec<String>,
    counts: Vec<u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new(labels: Vec<String>) -> Result<Self, ConfigError> {
        let k = labels.len();
        if k < 2 || critical_value_5pct(k - 1).is_none() {
            return Err(ConfigError::UnsupportedCategoryCount(k));
        }
        Ok(Self { counts: vec![0; k], labels, total: 0 })
    }

    /// Categories labelled `"1"..="k"`, as for dice faces.
    pub fn numbered(k: usize) -> Result<Self, ConfigError> {
        Self::new((1..=k).map(|i| i.to_string()).collect())
    }

    /// Table with preset counts.
    pub fn from_counts(labels: Vec<String>, counts: Vec<u64>) -> Result<Self, ConfigError> {
        let mut table = Self::new(labels)?;
        if counts.len() != table.counts.len() {
            return Err(ConfigError::UnsupportedCategoryCount(counts.len()));
        }
        table.total = counts.iter().sum();
        table.counts = counts;
        Ok(table)
    }

    /// Count one observation. Out-of-range indices are ignored.
    pub fn record(&mut self, index: usize) {
        if let Some(c) = self.counts.get_mut(index) {
            *c += 1;
            self.total += 1;
        }
    }

    pub fn record_all(&mut self, indices: impl IntoIterator<Item = usize>) {
        for i in indices {
            self.record(i);
        }
    }

    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.total = 0;
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn categories(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn expected(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.total as f64 / self.categories() as f64)
    }

    /// Largest `|O_i − E|`.
    pub fn max_deviation(&self) -> Option<f64> {
        let e = self.expected()?;
        Some(self.counts.iter().map(|&c| (c as f64 - e).abs()).fold(0.0, f64::max))
    }

    /// `max_deviation / E` as a percentage.
    pub fn deviation_rate(&self) -> Option<f64> {
        crate::types::percent(self.max_deviation()?, self.expected()?)
    }

    pub fn chi_square(&self) -> ChiSquareReport {
        let df = self.categories() - 1;
        // Constructor guarantees a tabulated df.
        let critical_value = critical_value_5pct(df).unwrap_or(f64::INFINITY);
        let expected = self.expected();
        let chi_square = expected.map(|e| {
            self.counts
                .iter()
                .map(|&c| {
                    let d = c as f64 - e;
                    d * d / e
                })
                .sum::<f64>()
        });
        let verdict = match chi_square {
            None => BiasVerdict::InsufficientData,
            Some(x) if x > critical_value => BiasVerdict::Biased,
            Some(_) => BiasVerdict::Consistent,
        };
        ChiSquareReport {
            total: self.total,
            degrees_of_freedom: df,
            critical_value,
            expected,
            chi_square,
            verdict,
        }
    }
}
