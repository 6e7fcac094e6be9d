// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Claw Machine

//! Claw machine whose grip strength is set by the operator's payout target.
//!
//! The escalator's target trial count is `expected_value / cost_per_play`:
//! a 500 yen prize at 100 yen a play is guaranteed by the fifth attempt.
//! The arm animation is a separate phase machine the shell steps with
//! elapsed milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::escalator::{EscalationState, Escalator};
use crate::ledger::{Ledger, Yen};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawConfig {
    /// Prize value the operator expects to collect per prize, in yen.
    pub expected_value: u64,
    pub cost_per_play: u64,
    /// Grip strength (percent) after a success.
    pub baseline_grip: f64,
}

impl Default for ClawConfig {
    fn default() -> Self {
        Self { expected_value: 500, cost_per_play: 100, baseline_grip: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawState {
    pub escalation: EscalationState,
    pub attempts: u64,
    pub prizes: u64,
    pub ledger: Ledger,
}

/// Record of one play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawPlay {
    pub attempt: u64,
    pub grip_strength: f64,
    pub success: bool,
    pub cost: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawStats {
    pub attempts: u64,
    pub prizes: u64,
    pub success_rate: Option<f64>,
    pub cost_per_prize: Option<f64>,
    pub total_cost: f64,
    pub next_grip_strength: f64,
    pub guaranteed_by: u64,
    pub expected_attempts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClawMachine {
    config: ClawConfig,
    escalator: Escalator,
}

impl ClawMachine {
    pub fn new(config: ClawConfig) -> Result<Self, ConfigError> {
        let escalator = Escalator::from_costs(
            config.expected_value as f64,
            config.cost_per_play as f64,
            config.baseline_grip,
        )?;
        Ok(Self { config, escalator })
    }

    pub fn config(&self) -> &ClawConfig {
        &self.config
    }

    pub fn escalator(&self) -> &Escalator {
        &self.escalator
    }

    pub fn reset(&self) -> ClawState {
        ClawState {
            escalation: self.escalator.reset(),
            attempts: 0,
            prizes: 0,
            ledger: Ledger::default(),
        }
    }

    pub fn play(&self, state: ClawState, u: f64) -> (ClawState, ClawPlay) {
        let (escalation, attempt) = self.escalator.attempt(state.escalation, u);
        let prize = Yen::new(self.config.expected_value);
        let ledger = state.ledger.charge(Yen::new(self.config.cost_per_play), 1);
        let next = ClawState {
            escalation,
            attempts: state.attempts + 1,
            prizes: state.prizes + attempt.success as u64,
            ledger: if attempt.success { ledger.credit(prize) } else { ledger },
        };
        let play = ClawPlay {
            attempt: next.attempts,
            grip_strength: attempt.probability,
            success: attempt.success,
            cost: self.config.cost_per_play,
        };
        (next, play)
    }

    pub fn play_from<R: RandomSource>(&self, state: ClawState, source: &mut R) -> (ClawState, ClawPlay) {
        self.play(state, source.next_unit())
    }

    /// Auto-play `count` attempts in one pass.
    pub fn play_many<R: RandomSource>(
        &self,
        state: ClawState,
        count: u32,
        source: &mut R,
    ) -> (ClawState, Vec<ClawPlay>) {
        let mut plays = Vec::with_capacity(count as usize);
        let mut current = state;
        for _ in 0..count {
            let (next, play) = self.play_from(current, source);
            plays.push(play);
            current = next;
        }
        (current, plays)
    }

    pub fn stats(&self, state: &ClawState) -> ClawStats {
        ClawStats {
            attempts: state.attempts,
            prizes: state.prizes,
            success_rate: crate::types::percent(state.prizes as f64, state.attempts as f64),
            cost_per_prize: state.ledger.cost_per_success(state.prizes),
            total_cost: state.ledger.spent.to_f64(),
            next_grip_strength: self.escalator.probability(state.escalation.failure_count),
            guaranteed_by: self.escalator.target_trials(),
            expected_attempts: self.escalator.expected_attempts(),
        }
    }
}

// ─── Arm animation ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmPhase {
    Move,
    Descend,
    Settle,
    Grip,
    Ascend,
    Deliver,
    Drop,
    Release,
    Done,
}

impl ArmPhase {
    pub fn duration_ms(&self) -> f64 {
        match self {
            ArmPhase::Move => 500.0,
            ArmPhase::Descend => 800.0,
            ArmPhase::Settle => 200.0,
            ArmPhase::Grip => 300.0,
            ArmPhase::Ascend => 800.0,
            ArmPhase::Deliver => 600.0,
            ArmPhase::Drop => 400.0,
            ArmPhase::Release => 300.0,
            ArmPhase::Done => 0.0,
        }
    }
}

/// Arm position in cabinet pixels (440 × 400 playfield).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    pub x: f64,
    pub y: f64,
    pub gripping: bool,
    pub holding_prize: bool,
}

const HOME_X: f64 = 220.0;
const CENTRE_X: f64 = 220.0;
const CHUTE_X: f64 = 390.0;
const TOP_Y: f64 = 60.0;
const FLOOR_Y: f64 = 250.0;
const LIFT_Y: f64 = 100.0;
const CHUTE_Y: f64 = 320.0;

/// One play's arm motion. The outcome is fixed when the play is made and
/// revealed when the grip closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmAnimation {
    pub phase: ArmPhase,
    /// Milliseconds into the current phase.
    pub elapsed_ms: f64,
    pub success: bool,
}

impl ArmAnimation {
    pub fn start(play: &ClawPlay) -> Self {
        Self { phase: ArmPhase::Move, elapsed_ms: 0.0, success: play.success }
    }

    pub fn is_done(&self) -> bool {
        self.phase == ArmPhase::Done
    }

    fn next_phase(&self) -> ArmPhase {
        match self.phase {
            ArmPhase::Move => ArmPhase::Descend,
            ArmPhase::Descend => ArmPhase::Settle,
            ArmPhase::Settle => ArmPhase::Grip,
            ArmPhase::Grip => ArmPhase::Ascend,
            ArmPhase::Ascend if self.success => ArmPhase::Deliver,
            ArmPhase::Ascend => ArmPhase::Release,
            ArmPhase::Deliver => ArmPhase::Drop,
            ArmPhase::Drop | ArmPhase::Release | ArmPhase::Done => ArmPhase::Done,
        }
    }

    /// Advance by `dt_ms`, carrying leftover time into following phases.
    pub fn step(self, dt_ms: f64) -> Self {
        let mut anim = self;
        let mut remaining = dt_ms.max(0.0) + anim.elapsed_ms;
        while !anim.is_done() && remaining >= anim.phase.duration_ms() {
            remaining -= anim.phase.duration_ms();
            anim.phase = anim.next_phase();
        }
        anim.elapsed_ms = if anim.is_done() { 0.0 } else { remaining };
        anim
    }

    /// Total length of the animation for this outcome.
    pub fn total_ms(&self) -> f64 {
        let tail = if self.success {
            ArmPhase::Deliver.duration_ms() + ArmPhase::Drop.duration_ms()
        } else {
            ArmPhase::Release.duration_ms()
        };
        [ArmPhase::Move, ArmPhase::Descend, ArmPhase::Settle, ArmPhase::Grip, ArmPhase::Ascend]
            .iter()
            .map(ArmPhase::duration_ms)
            .sum::<f64>()
            + tail
    }

    pub fn pose(&self) -> ArmPose {
        let duration = self.phase.duration_ms();
        let t = if duration > 0.0 { (self.elapsed_ms / duration).min(1.0) } else { 1.0 };
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        let held = self.success;
        let pose = |x, y, gripping, holding_prize| ArmPose { x, y, gripping, holding_prize };
        match self.phase {
            ArmPhase::Move => pose(lerp(HOME_X, CENTRE_X), TOP_Y, false, false),
            ArmPhase::Descend => pose(CENTRE_X, lerp(TOP_Y, FLOOR_Y), false, false),
            ArmPhase::Settle => pose(CENTRE_X, FLOOR_Y, false, false),
            ArmPhase::Grip => pose(CENTRE_X, FLOOR_Y, true, held),
            ArmPhase::Ascend => pose(CENTRE_X, lerp(FLOOR_Y, LIFT_Y), true, held),
            ArmPhase::Deliver => pose(lerp(CENTRE_X, CHUTE_X), LIFT_Y, true, true),
            ArmPhase::Drop => pose(CHUTE_X, lerp(LIFT_Y, CHUTE_Y), false, false),
            ArmPhase::Release => pose(CENTRE_X, LIFT_Y, false, false),
            ArmPhase::Done => pose(HOME_X, TOP_Y, false, false),
        }
    }
}
