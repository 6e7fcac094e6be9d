// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Lottery Simulator

//! Jumbo-style lottery: eight prize tiers over ten million tickets, 300 yen
//! each. Buying is batched: every ticket in a purchase is drawn in one pass
//! and the state is committed once at the end.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ledger::{Ledger, Yen};
use crate::random::RandomSource;
use crate::sampler::{DistributionTable, Draw, WeightedOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub label: String,
    pub probability: f64,
    pub payout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    pub ticket_price: u64,
    /// Tiers in draw order. Unclaimed probability is a losing ticket.
    pub prizes: Vec<Prize>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        let tier = |label: &str, per_ten_million: f64, payout| Prize {
            label: label.to_string(),
            probability: per_ten_million / 10_000_000.0,
            payout,
        };
        Self {
            ticket_price: 300,
            prizes: vec![
                tier("1st", 1.0, 700_000_000),
                tier("1st adjacent", 2.0, 150_000_000),
                tier("2nd", 3.0, 10_000_000),
                tier("3rd", 10.0, 1_000_000),
                tier("4th", 100.0, 100_000),
                tier("5th", 1_000.0, 10_000),
                tier("6th", 10_000.0, 3_000),
                tier("7th", 100_000.0, 300),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryState {
    pub purchased: u64,
    pub ledger: Ledger,
    /// Wins per prize tier, in table order.
    pub prize_counts: Vec<u64>,
    pub losing_tickets: u64,
    /// How hard the buyer is praying (0..=100). Never read by the draw.
    pub prayer_level: u8,
}

/// What one purchase produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub tickets: u64,
    pub won: Yen,
    pub prize_counts: Vec<u64>,
    pub losing_tickets: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryStats {
    pub purchased: u64,
    pub spent: f64,
    pub won: f64,
    pub net: f64,
    /// Percent of spend paid back.
    pub return_rate: Option<f64>,
    pub prize_counts: Vec<(String, u64)>,
    pub losing_tickets: u64,
    pub expected_value_per_ticket: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lottery {
    table: DistributionTable,
    ticket_price: Yen,
}

impl Lottery {
    pub fn new(config: LotteryConfig) -> Result<Self, ConfigError> {
        let outcomes = config
            .prizes
            .iter()
            .map(|p| WeightedOutcome::new(&p.label, p.probability).with_magnitude(p.payout as f64))
            .collect();
        Ok(Self {
            table: DistributionTable::new(outcomes)?,
            ticket_price: Yen::new(config.ticket_price),
        })
    }

    pub fn reset(&self) -> LotteryState {
        LotteryState {
            purchased: 0,
            ledger: Ledger::default(),
            prize_counts: vec![0; self.table.len()],
            losing_tickets: 0,
            prayer_level: 0,
        }
    }

    pub fn table(&self) -> &DistributionTable {
        &self.table
    }

    /// Payout for a draw, zero for a losing ticket.
    pub fn payout(&self, draw: Draw) -> Yen {
        self.table.magnitude(draw).map_or(Yen::zero(), Yen::from_f64)
    }

    /// Buy `count` tickets.
    pub fn buy<R: RandomSource>(
        &self,
        state: LotteryState,
        count: u64,
        source: &mut R,
    ) -> (LotteryState, Purchase) {
        let mut prize_counts = vec![0u64; self.table.len()];
        let mut losing_tickets = 0u64;
        let mut won = Yen::zero();

        for _ in 0..count {
            let draw = self.table.sample_from(source);
            match draw {
                Draw::Hit(i) => {
                    prize_counts[i] += 1;
                    won += self.payout(draw);
                }
                Draw::Miss => losing_tickets += 1,
            }
        }

        let totals = state
            .prize_counts
            .iter()
            .zip(&prize_counts)
            .map(|(a, b)| a + b)
            .collect();
        let next = LotteryState {
            purchased: state.purchased + count,
            ledger: state.ledger.charge(self.ticket_price, count).credit(won),
            prize_counts: totals,
            losing_tickets: state.losing_tickets + losing_tickets,
            prayer_level: state.prayer_level,
        };
        (next, Purchase { tickets: count, won, prize_counts, losing_tickets })
    }

    pub fn pray(&self, state: LotteryState, level: u8) -> LotteryState {
        LotteryState { prayer_level: level.min(100), ..state }
    }

    /// `Σ p · payout` per ticket.
    pub fn expected_value_per_ticket(&self) -> f64 {
        self.table.expected_magnitude()
    }

    pub fn stats(&self, state: &LotteryState) -> LotteryStats {
        let labels = self.table.outcomes().iter().map(|o| o.label.clone());
        LotteryStats {
            purchased: state.purchased,
            spent: state.ledger.spent.to_f64(),
            won: state.ledger.won.to_f64(),
            net: state.ledger.net().to_f64(),
            return_rate: state.ledger.return_rate().map(|r| r * 100.0),
            prize_counts: labels.zip(state.prize_counts.iter().copied()).collect(),
            losing_tickets: state.losing_tickets,
            expected_value_per_ticket: self.expected_value_per_ticket(),
        }
    }
}
