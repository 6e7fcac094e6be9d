// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Slot Machine

//! Slot machine whose result is decided the moment the lever is pulled.
//!
//! The reels are pure presentation: the pay table is sampled first, then
//! reel faces are chosen to match. Losing spins sometimes get a "reach"
//! tease, two matching reels and a different third.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ledger::{Ledger, Yen};
use crate::random::RandomSource;
use crate::sampler::{DistributionTable, Draw, WeightedOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Bell,
    Star,
    Seven,
}

impl Symbol {
    pub const ALL: [Symbol; 6] =
        [Symbol::Cherry, Symbol::Lemon, Symbol::Orange, Symbol::Bell, Symbol::Star, Symbol::Seven];

    fn nth(i: usize) -> Symbol {
        Self::ALL[i % Self::ALL.len()]
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayLine {
    pub symbol: Symbol,
    pub name: String,
    pub probability: f64,
    pub payout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub cost_per_spin: u64,
    pub pay_lines: Vec<PayLine>,
    /// Chance that a losing spin is shown as a reach.
    pub tease_probability: f64,
    pub spin_ms: u32,
    pub reach_spin_ms: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        let line = |symbol, name: &str, probability, payout| PayLine {
            symbol,
            name: name.to_string(),
            probability,
            payout,
        };
        Self {
            cost_per_spin: 100,
            pay_lines: vec![
                line(Symbol::Seven, "jackpot", 0.001, 1_000),
                line(Symbol::Star, "big win", 0.005, 300),
                line(Symbol::Bell, "small win", 0.02, 100),
                line(Symbol::Cherry, "cherry", 0.05, 50),
            ],
            tease_probability: 0.3,
            spin_ms: 1_500,
            reach_spin_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presentation {
    /// Winning line, always staged as a reach.
    WinningReach,
    /// Losing spin dressed up as a near miss.
    TeaseReach,
    Plain,
}

impl Presentation {
    pub fn is_reach(&self) -> bool {
        !matches!(self, Presentation::Plain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    pub reels: [Symbol; 3],
    pub win: bool,
    pub payout: u64,
    pub presentation: Presentation,
    /// How long the shell should spin the reels before stopping.
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotState {
    pub spins: u64,
    pub wins: u64,
    pub reaches: u64,
    pub reach_wins: u64,
    pub ledger: Ledger,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotStats {
    pub spins: u64,
    pub wins: u64,
    pub win_rate: Option<f64>,
    pub reaches: u64,
    /// Percent of reach presentations that paid out.
    pub reach_win_rate: Option<f64>,
    pub cost: f64,
    pub payout: f64,
    pub net: f64,
    pub return_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotMachine {
    config: SlotConfig,
    table: DistributionTable,
}

impl SlotMachine {
    pub fn new(config: SlotConfig) -> Result<Self, ConfigError> {
        let p = config.tease_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::ProbabilityOutOfRange { name: "tease".into(), p });
        }
        let outcomes = config
            .pay_lines
            .iter()
            .map(|l| WeightedOutcome::new(&l.name, l.probability).with_magnitude(l.payout as f64))
            .collect();
        let table = DistributionTable::new(outcomes)?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn reset(&self) -> SlotState {
        SlotState::default()
    }

    /// Samples: the result, then on a loss the tease roll and reel faces.
    pub fn spin<R: RandomSource>(&self, state: SlotState, source: &mut R) -> (SlotState, Spin) {
        let spin = match self.table.sample_from(source) {
            Draw::Hit(i) => {
                let line = &self.config.pay_lines[i];
                Spin {
                    reels: [line.symbol; 3],
                    win: true,
                    payout: line.payout,
                    presentation: Presentation::WinningReach,
                    duration_ms: self.config.reach_spin_ms,
                }
            }
            Draw::Miss => self.losing_spin(source),
        };

        let reach = spin.presentation.is_reach();
        let ledger = state
            .ledger
            .charge(Yen::new(self.config.cost_per_spin), 1)
            .credit(Yen::new(spin.payout));
        let next = SlotState {
            spins: state.spins + 1,
            wins: state.wins + spin.win as u64,
            reaches: state.reaches + reach as u64,
            reach_wins: state.reach_wins + (reach && spin.win) as u64,
            ledger,
        };
        (next, spin)
    }

    fn losing_spin<R: RandomSource>(&self, source: &mut R) -> Spin {
        let n = Symbol::ALL.len();
        let tease = source.next_unit() < self.config.tease_probability;
        let first = source.next_index(n);
        let second = if tease { first } else { source.next_index(n) };
        let third = if first == second {
            // never let a loss line up three of a kind
            (first + 1 + source.next_index(n - 1)) % n
        } else {
            source.next_index(n)
        };
        let reels = [Symbol::nth(first), Symbol::nth(second), Symbol::nth(third)];
        let presentation = if tease { Presentation::TeaseReach } else { Presentation::Plain };
        let duration_ms =
            if tease { self.config.reach_spin_ms } else { self.config.spin_ms };
        Spin { reels, win: false, payout: 0, presentation, duration_ms }
    }

    pub fn spin_many<R: RandomSource>(
        &self,
        state: SlotState,
        count: u32,
        source: &mut R,
    ) -> (SlotState, Vec<Spin>) {
        let mut spins = Vec::with_capacity(count as usize);
        let mut current = state;
        for _ in 0..count {
            let (next, spin) = self.spin(current, source);
            spins.push(spin);
            current = next;
        }
        (current, spins)
    }

    pub fn stats(&self, state: &SlotState) -> SlotStats {
        use crate::types::percent;
        SlotStats {
            spins: state.spins,
            wins: state.wins,
            win_rate: percent(state.wins as f64, state.spins as f64),
            reaches: state.reaches,
            reach_win_rate: percent(state.reach_wins as f64, state.reaches as f64),
            cost: state.ledger.spent.to_f64(),
            payout: state.ledger.won.to_f64(),
            net: state.ledger.net().to_f64(),
            return_rate: state.ledger.return_rate().map(|r| r * 100.0),
        }
    }

    /// Theoretical payout per yen spent.
    pub fn theoretical_return(&self) -> Option<f64> {
        crate::types::ratio(self.table.expected_magnitude(), self.config.cost_per_spin as f64)
    }
}

/// Whether all three reels show the same symbol.
pub fn is_line(reels: &[Symbol; 3]) -> bool {
    reels[0] == reels[1] && reels[1] == reels[2]
}

/// Symbol index used by the shell's reel strip.
pub fn reel_index(symbol: Symbol) -> usize {
    symbol.position()
}
