// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Adaptive Probability Escalator

//! Rigged success probability that climbs with the failure streak.
//!
//! With a target of `N` trials and a baseline `p0` (percent):
//!
//! ```text
//! p(f) = min(100, p0 + f · (100 − p0) / (N − 1))
//! ```
//!
//! so `p(0) = p0` and `p(N − 1) = 100`: the Nth attempt after N − 1
//! straight failures always succeeds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::RandomSource;

/// Log-survival error allowed inside one summation block.
const SURVIVAL_ERROR: f64 = 1e-10;

// ─── EscalationState ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscalationState {
    /// Consecutive failures since the last success.
    pub failure_count: u64,
    pub target_trials: u64,
    /// Percent, in `[0, 100]`.
    pub baseline_probability: f64,
}

// ─── Attempt ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub success: bool,
    /// Success probability (percent) the attempt was judged against.
    pub probability: f64,
    pub failures_before: u64,
}

// ─── Escalator ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Escalator {
    target_trials: u64,
    baseline: f64,
}

impl Escalator {
    pub fn new(target_trials: u64, baseline: f64) -> Result<Self, ConfigError> {
        if target_trials < 2 {
            return Err(ConfigError::TargetTrialsTooSmall(target_trials));
        }
        if !baseline.is_finite() || !(0.0..=100.0).contains(&baseline) {
            return Err(ConfigError::BaselineOutOfRange(baseline));
        }
        Ok(Self { target_trials, baseline })
    }

    /// `N = floor(expected_cost / unit_cost)`.
    pub fn from_costs(expected_cost: f64, unit_cost: f64, baseline: f64) -> Result<Self, ConfigError> {
        let valid = |c: f64| c.is_finite() && c > 0.0;
        if !valid(expected_cost) || !valid(unit_cost) {
            return Err(ConfigError::InvalidCost { expected: expected_cost, unit: unit_cost });
        }
        let trials = (expected_cost / unit_cost).floor();
        Self::new(if trials >= u64::MAX as f64 { u64::MAX } else { trials as u64 }, baseline)
    }

    pub fn reset(&self) -> EscalationState {
        EscalationState {
            failure_count: 0,
            target_trials: self.target_trials,
            baseline_probability: self.baseline,
        }
    }

    pub fn target_trials(&self) -> u64 {
        self.target_trials
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Percentage points added per consecutive failure.
    pub fn increment(&self) -> f64 {
        (100.0 - self.baseline) / (self.target_trials - 1) as f64
    }

    /// Success probability in percent after `failures` straight failures.
    pub fn probability(&self, failures: u64) -> f64 {
        if failures >= self.target_trials - 1 {
            return 100.0;
        }
        (self.baseline + failures as f64 * self.increment()).min(100.0)
    }

    /// Succeeds iff `u · 100 < p(f)`.
    pub fn attempt(&self, state: EscalationState, u: f64) -> (EscalationState, Attempt) {
        let probability = self.probability(state.failure_count);
        let success = u * 100.0 < probability;
        let failure_count = if success { 0 } else { state.failure_count.saturating_add(1) };
        let attempt = Attempt { success, probability, failures_before: state.failure_count };
        (EscalationState { failure_count, ..state }, attempt)
    }

    pub fn attempt_from<R: RandomSource>(
        &self,
        state: EscalationState,
        source: &mut R,
    ) -> (EscalationState, Attempt) {
        self.attempt(state, source.next_unit())
    }

    /// Expected number of attempts per success under this schedule.
    ///
    /// Steps are summed in blocks at the block's mean probability, each a
    /// geometric series. Block length keeps the log-survival error below
    /// `SURVIVAL_ERROR`, so huge targets stay cheap.
    pub fn expected_attempts(&self) -> f64 {
        // E[T] = Σ_{k≥0} P(T > k), P(T > k) = Π_{f<k} (1 − p(f)/100)
        let last = self.target_trials - 1;
        let step = self.increment() / 100.0;
        let span = (8.0 * SURVIVAL_ERROR / step).sqrt() as u64;
        let mut survive = 1.0f64;
        let mut expected = 0.0;
        let mut f = 0u64;
        while f < last && survive > 0.0 {
            let block = span.clamp(1, last - f);
            let mean = ((self.baseline + (f as f64 + (block - 1) as f64 / 2.0) * self.increment()) / 100.0).min(1.0);
            if block == 1 {
                expected += survive;
                survive *= 1.0 - mean;
            } else if mean > 0.0 {
                let keep = (1.0 - mean).powf(block as f64);
                expected += survive * (1.0 - keep) / mean;
                survive *= keep;
            } else {
                expected += survive * block as f64;
            }
            f += block;
            // probability only climbs, so the tail is at most survive / p
            let hazard = self.probability(f) / 100.0;
            if hazard > 0.0 && survive / hazard <= expected * f64::EPSILON {
                break;
            }
        }
        // p(N − 1) = 100
        expected + survive
    }
}
