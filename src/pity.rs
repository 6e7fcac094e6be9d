// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Pity / Ceiling Tracker

//! Bounded-wait guarantee on top of the categorical sampler.
//!
//! Each draw increments the streak first. When the streak reaches the
//! threshold the rare outcome is forced without consulting the sampler;
//! otherwise the sampler runs and a natural rare hit also resets the
//! streak. The forced check always comes first, so a draw that would also
//! have been a natural hit is reported once, as forced.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::RandomSource;
use crate::sampler::{DistributionTable, Draw};

// ─── PityState ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    /// Draws since the last rare outcome.
    pub streak: u32,
    pub threshold: u32,
}

impl PityState {
    /// Draws left until the rare outcome is guaranteed (1 = the next draw).
    pub fn draws_until_forced(&self) -> u32 {
        self.threshold.saturating_sub(self.streak)
    }
}

// ─── PityDraw ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityDraw {
    pub draw: Draw,
    /// True when the ceiling produced the rare outcome.
    pub forced: bool,
    /// Streak value this draw was evaluated at (after the increment).
    pub streak_at_draw: u32,
}

// ─── PityTracker ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PityTracker {
    table: DistributionTable,
    rare_index: usize,
    threshold: u32,
}

impl PityTracker {
    pub fn new(
        table: DistributionTable,
        rare_index: usize,
        threshold: u32,
    ) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::NonPositiveThreshold);
        }
        if rare_index >= table.len() {
            return Err(ConfigError::RareIndexOutOfRange { index: rare_index, len: table.len() });
        }
        Ok(Self { table, rare_index, threshold })
    }

    pub fn reset(&self) -> PityState {
        PityState { streak: 0, threshold: self.threshold }
    }

    pub fn table(&self) -> &DistributionTable {
        &self.table
    }

    pub fn rare_index(&self) -> usize {
        self.rare_index
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether the next draw from `state` bypasses the sampler.
    pub fn will_force(&self, state: PityState) -> bool {
        state.streak.saturating_add(1) >= state.threshold
    }

    /// One guarded draw. `u` is ignored when the ceiling fires.
    pub fn draw(&self, state: PityState, u: f64) -> (PityState, PityDraw) {
        let streak = state.streak.saturating_add(1);
        if streak >= state.threshold {
            let rare = Draw::Hit(self.rare_index);
            let draw = PityDraw { draw: rare, forced: true, streak_at_draw: streak };
            return (PityState { streak: 0, ..state }, draw);
        }
        self.natural(state, streak, u)
    }

    /// Guarded draw pulling a sample only when the sampler actually runs.
    pub fn draw_from<R: RandomSource>(&self, state: PityState, source: &mut R) -> (PityState, PityDraw) {
        if self.will_force(state) {
            self.draw(state, 0.0)
        } else {
            self.draw(state, source.next_unit())
        }
    }

    /// Draw with the ceiling switched off. The streak is still counted so
    /// the presentation can show how long the wait has been.
    pub fn draw_unguarded(&self, state: PityState, u: f64) -> (PityState, PityDraw) {
        self.natural(state, state.streak.saturating_add(1), u)
    }

    fn natural(&self, state: PityState, streak: u32, u: f64) -> (PityState, PityDraw) {
        let draw = self.table.sample(u);
        let next = if draw.is_hit(self.rare_index) { 0 } else { streak };
        let pity_draw = PityDraw { draw, forced: false, streak_at_draw: streak };
        (PityState { streak: next, ..state }, pity_draw)
    }
}
