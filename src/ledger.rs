// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Money Ledger

//! Yen accounting for the paid demonstrations (lottery, gacha, claw, slot).
//!
//! Spend and winnings are kept in `Decimal` and only converted to `f64` at
//! the presentation boundary.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

// ---------------------------------------------------------------------------
// Yen
// ---------------------------------------------------------------------------

/// Yen amount backed by `rust_decimal::Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Yen(pub Decimal);

impl Yen {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn new(amount: u64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Lossy conversion from a float payout; non-finite input becomes zero.
    pub fn from_f64(amount: f64) -> Self {
        Self(Decimal::from_f64(amount).unwrap_or(Decimal::ZERO))
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Yen {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Yen {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Yen {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u64> for Yen {
    type Output = Self;
    fn mul(self, count: u64) -> Self {
        Self(self.0 * Decimal::from(count))
    }
}

impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Running totals of what was paid in and what came back out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub spent: Yen,
    pub won: Yen,
}

impl Ledger {
    pub fn charge(self, price: Yen, count: u64) -> Self {
        Self { spent: self.spent + price * count, ..self }
    }

    pub fn credit(self, amount: Yen) -> Self {
        Self { won: self.won + amount, ..self }
    }

    /// Winnings minus spend (negative for the house's margin).
    pub fn net(&self) -> Yen {
        self.won - self.spent
    }

    /// Fraction of spend returned as winnings, `None` before any spend.
    pub fn return_rate(&self) -> Option<f64> {
        crate::types::ratio(self.won.to_f64(), self.spent.to_f64())
    }

    /// Average spend per success, `None` when there were no successes.
    pub fn cost_per_success(&self, successes: u64) -> Option<f64> {
        crate::types::ratio(self.spent.to_f64(), successes as f64)
    }
}
