// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Shared Types

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign};

// ─── Vec3 ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl MulAssign<f64> for Vec3 {
    fn mul_assign(&mut self, k: f64) {
        self.x *= k;
        self.y *= k;
        self.z *= k;
    }
}

// ─── Guarded ratios ─────────────────────────────────────────────────────────

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Same as [`ratio`] scaled to a percentage.
pub fn percent(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator, denominator).map(|r| r * 100.0)
}

// ─── Probability sums ───────────────────────────────────────────────────────

/// Sum of probabilities, required to be at most 1.
///
/// Rounding slack of one ulp per term is accepted and clamped to exactly 1.
/// `Err` carries the raw sum.
pub fn probability_sum<I: IntoIterator<Item = f64>>(values: I) -> Result<f64, f64> {
    let (total, terms) = values.into_iter().fold((0.0f64, 0u32), |(t, n), p| (t + p, n + 1));
    if total <= 1.0 {
        Ok(total)
    } else if total - 1.0 <= f64::from(terms) * f64::EPSILON {
        Ok(1.0)
    } else {
        Err(total)
    }
}

// ─── Streak ─────────────────────────────────────────────────────────────────

/// Current and longest run of consecutive events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
}

impl Streak {
    pub fn extend(self) -> Self {
        let current = self.current + 1;
        Self { current, longest: self.longest.max(current) }
    }

    pub fn break_off(self) -> Self {
        Self { current: 0, longest: self.longest }
    }
}
