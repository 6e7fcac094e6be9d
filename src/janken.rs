// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Janken

//! Rock-paper-scissors: draw streaks between two random players, and a CPU
//! that can quietly throw after seeing the player's hand.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::types::Streak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Rock,
    Scissors,
    Paper,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Scissors, Hand::Paper];

    pub fn random<R: RandomSource>(source: &mut R) -> Hand {
        Self::ALL[source.next_index(3)]
    }

    /// The hand that beats this one.
    pub fn beaten_by(&self) -> Hand {
        match self {
            Hand::Rock => Hand::Paper,
            Hand::Scissors => Hand::Rock,
            Hand::Paper => Hand::Scissors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Win,
    Lose,
    Draw,
}

/// Result from `player`'s side.
pub fn judge(player: Hand, opponent: Hand) -> RoundResult {
    if player == opponent {
        RoundResult::Draw
    } else if opponent.beaten_by() == player {
        RoundResult::Win
    } else {
        RoundResult::Lose
    }
}

/// Probability of `n` draws in a row, `(1/3)^n`.
pub fn draw_streak_probability(n: u32) -> f64 {
    (1.0f64 / 3.0).powf(f64::from(n))
}

// ─── Draw streaks ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawStreakState {
    pub games: u64,
    pub draws: Streak,
}

/// Two random hands; a draw extends the streak, anything else ends it.
pub fn play_random_pair<R: RandomSource>(
    state: DrawStreakState,
    source: &mut R,
) -> (DrawStreakState, (Hand, Hand)) {
    let a = Hand::random(source);
    let b = Hand::random(source);
    let draws = if a == b { state.draws.extend() } else { state.draws.break_off() };
    (DrawStreakState { games: state.games + 1, draws }, (a, b))
}

pub fn play_random_pairs<R: RandomSource>(
    state: DrawStreakState,
    count: u32,
    source: &mut R,
) -> DrawStreakState {
    (0..count).fold(state, |s, _| play_random_pair(s, source).0)
}

// ─── Late-throwing CPU ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum CpuMode {
    Fair,
    /// Waits `delay_ms` after the player commits, then plays the winner.
    LateThrow { delay_ms: u32 },
}

impl Default for CpuMode {
    fn default() -> Self {
        CpuMode::LateThrow { delay_ms: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub number: u64,
    pub player: Hand,
    pub cpu: Hand,
    pub result: RoundResult,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchState {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub win_rate: Option<f64>,
}

/// Only consumes a sample in fair mode.
pub fn play_round<R: RandomSource>(
    state: MatchState,
    mode: CpuMode,
    player: Hand,
    source: &mut R,
) -> (MatchState, Round) {
    let (cpu, delay_ms) = match mode {
        CpuMode::Fair => (Hand::random(source), 0),
        CpuMode::LateThrow { delay_ms } => (player.beaten_by(), delay_ms),
    };
    let result = judge(player, cpu);
    let next = MatchState {
        rounds: state.rounds + 1,
        wins: state.wins + (result == RoundResult::Win) as u64,
        losses: state.losses + (result == RoundResult::Lose) as u64,
        draws: state.draws + (result == RoundResult::Draw) as u64,
    };
    (next, Round { number: next.rounds, player, cpu, result, delay_ms })
}

pub fn match_stats(state: &MatchState) -> MatchStats {
    MatchStats {
        rounds: state.rounds,
        wins: state.wins,
        losses: state.losses,
        draws: state.draws,
        win_rate: crate::types::percent(state.wins as f64, state.rounds as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    #[test]
    fn judge_follows_the_cycle() {
        assert_eq!(judge(Hand::Paper, Hand::Rock), RoundResult::Win);
        assert_eq!(judge(Hand::Rock, Hand::Paper), RoundResult::Lose);
        assert_eq!(judge(Hand::Scissors, Hand::Paper), RoundResult::Win);
        assert_eq!(judge(Hand::Rock, Hand::Rock), RoundResult::Draw);
    }

    #[test]
    fn draw_streak_extends_and_breaks() {
        // rock/rock, paper/paper, rock/scissors
        let mut source = ScriptedSource::new(vec![0.1, 0.2, 0.9, 0.8, 0.1, 0.5]);
        let state = play_random_pairs(DrawStreakState::default(), 3, &mut source);
        assert_eq!(state.games, 3);
        assert_eq!(state.draws.current, 0);
        assert_eq!(state.draws.longest, 2);
    }

    #[test]
    fn streak_probability_is_a_power_of_a_third() {
        assert_eq!(draw_streak_probability(0), 1.0);
        assert!((draw_streak_probability(3) - 1.0 / 27.0).abs() < 1e-15);
    }

    #[test]
    fn long_streaks_vanish_instead_of_overflowing() {
        for n in [700, 1_000, i32::MAX as u32 + 1, 3_000_000_000, u32::MAX] {
            let p = draw_streak_probability(n);
            assert!((0.0..=1.0).contains(&p), "p({n}) = {p}");
        }
        assert_eq!(draw_streak_probability(u32::MAX), 0.0);
    }

    #[test]
    fn late_thrower_never_loses() {
        let mut state = MatchState::default();
        let mut rng = SeededSource::new(1);
        for _ in 0..300 {
            let hand = Hand::random(&mut rng);
            let (next, round) = play_round(state, CpuMode::default(), hand, &mut rng);
            assert_eq!(round.result, RoundResult::Lose);
            state = next;
        }
        assert_eq!(match_stats(&state).win_rate, Some(0.0));
    }

    #[test]
    fn fair_cpu_wins_about_a_third() {
        let mut state = MatchState::default();
        let mut rng = SeededSource::new(2);
        for _ in 0..30_000 {
            let (next, _) = play_round(state, CpuMode::Fair, Hand::Rock, &mut rng);
            state = next;
        }
        let win_rate = match_stats(&state).win_rate.unwrap();
        assert!((win_rate - 100.0 / 3.0).abs() < 1.5, "win rate {win_rate}");
        assert_eq!(state.wins + state.losses + state.draws, 30_000);
    }
}
