// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Random Sources

//! Swappable sampling interface.
//!
//! Core transitions take a single uniform sample `u ∈ [0, 1)`; simulators
//! pull those samples from a [`RandomSource`]. Production code uses the
//! seeded ChaCha8 source, tests pin exact sequences with
//! [`ScriptedSource`] or [`ConstantSource`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `0..n`, computed as `floor(u * n)`.
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_unit() * n as f64) as usize).min(n - 1)
    }

    /// Uniform value in `[lo, hi)`.
    fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

// ─── SeededSource ───────────────────────────────────────────────────────────

/// ChaCha8 generator seeded from a `u64`. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ─── ScriptedSource ─────────────────────────────────────────────────────────

/// Replays a fixed sequence of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Samples are clamped into `[0, 1)`; an empty script yields `0.0`.
    pub fn new(samples: Vec<f64>) -> Self {
        let samples = samples
            .into_iter()
            .map(|u| if u.is_finite() { u.clamp(0.0, MAX_UNIT) } else { 0.0 })
            .collect();
        Self { samples, cursor: 0 }
    }

    /// Number of samples handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let u = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        u
    }
}

// ─── ConstantSource ─────────────────────────────────────────────────────────

/// Always returns the same sample.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(pub f64);

impl RandomSource for ConstantSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Largest `f64` strictly below 1.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;
