// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Gacha Simulator

//! Four-rarity gacha with a pity ceiling and a "rate-up" banner.
//!
//! The N rate is whatever the other tiers leave over, so the banner's
//! doubled SSR/SR rates come out of N.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ledger::{Ledger, Yen};
use crate::pity::{PityState, PityTracker};
use crate::random::RandomSource;
use crate::sampler::DistributionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Ssr,
    Sr,
    R,
    N,
}

impl Rarity {
    /// Table order, rarest first.
    pub const ALL: [Rarity; 4] = [Rarity::Ssr, Rarity::Sr, Rarity::R, Rarity::N];

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Ssr => "SSR",
            Rarity::Sr => "SR",
            Rarity::R => "R",
            Rarity::N => "N",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GachaConfig {
    pub ssr_rate: f64,
    pub sr_rate: f64,
    pub r_rate: f64,
    /// Doubles the SSR and SR rates.
    pub rate_up: bool,
    pub ceiling_enabled: bool,
    pub ceiling: u32,
    pub pull_price: u64,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            ssr_rate: 0.01,
            sr_rate: 0.05,
            r_rate: 0.2,
            rate_up: false,
            ceiling_enabled: true,
            ceiling: 100,
            pull_price: 300,
        }
    }
}

impl GachaConfig {
    /// Effective `[SSR, SR, R, N]` rates.
    pub fn rates(&self) -> [f64; 4] {
        let boost = if self.rate_up { 2.0 } else { 1.0 };
        let ssr = self.ssr_rate * boost;
        let sr = self.sr_rate * boost;
        [ssr, sr, self.r_rate, 1.0 - (ssr + sr + self.r_rate)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GachaState {
    pub pity: PityState,
    pub pulls: u64,
    pub counts: [u64; 4],
    pub forced: u64,
    pub ledger: Ledger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub rarity: Rarity,
    pub forced: bool,
    /// Pulls since the previous SSR, this one included.
    pub streak_at_pull: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GachaStats {
    pub pulls: u64,
    pub counts: [u64; 4],
    pub forced: u64,
    /// Observed SSR percentage, ceiling hits included.
    pub actual_ssr_rate: Option<f64>,
    pub nominal_ssr_rate: f64,
    pub spent: f64,
    pub current_streak: u32,
    /// `None` with the ceiling off.
    pub pulls_until_ceiling: Option<u32>,
    pub cost_per_ssr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gacha {
    config: GachaConfig,
    tracker: PityTracker,
}

impl Gacha {
    pub fn new(config: GachaConfig) -> Result<Self, ConfigError> {
        let rates = config.rates();
        let pairs: Vec<(&str, f64)> =
            Rarity::ALL.iter().map(|r| r.label()).zip(rates).collect();
        let table = DistributionTable::from_weights(&pairs)?;
        // with the ceiling off the threshold is never reached
        let threshold = if config.ceiling_enabled { config.ceiling } else { u32::MAX };
        let tracker = PityTracker::new(table, Rarity::Ssr.index(), threshold)?;
        Ok(Self { config, tracker })
    }

    pub fn config(&self) -> &GachaConfig {
        &self.config
    }

    pub fn reset(&self) -> GachaState {
        GachaState {
            pity: self.tracker.reset(),
            pulls: 0,
            counts: [0; 4],
            forced: 0,
            ledger: Ledger::default(),
        }
    }

    pub fn pull<R: RandomSource>(&self, state: GachaState, source: &mut R) -> (GachaState, Pull) {
        let (pity, draw) = if self.config.ceiling_enabled {
            self.tracker.draw_from(state.pity, source)
        } else {
            self.tracker.draw_unguarded(state.pity, source.next_unit())
        };
        // Rounding can leave the last sliver of [0, 1) unclaimed; it is N.
        let rarity = draw.draw.index().map_or(Rarity::N, |i| Rarity::ALL[i]);
        let mut counts = state.counts;
        counts[rarity.index()] += 1;
        let next = GachaState {
            pity,
            pulls: state.pulls + 1,
            counts,
            forced: state.forced + draw.forced as u64,
            ledger: state.ledger.charge(Yen::new(self.config.pull_price), 1),
        };
        (next, Pull { rarity, forced: draw.forced, streak_at_pull: draw.streak_at_draw })
    }

    /// `count` pulls in one pass, e.g. a ten-pull.
    pub fn pull_many<R: RandomSource>(
        &self,
        state: GachaState,
        count: u32,
        source: &mut R,
    ) -> (GachaState, Vec<Pull>) {
        let mut pulls = Vec::with_capacity(count as usize);
        let mut current = state;
        for _ in 0..count {
            let (next, pull) = self.pull(current, source);
            pulls.push(pull);
            current = next;
        }
        (current, pulls)
    }

    pub fn stats(&self, state: &GachaState) -> GachaStats {
        let ssr = state.counts[Rarity::Ssr.index()];
        GachaStats {
            pulls: state.pulls,
            counts: state.counts,
            forced: state.forced,
            actual_ssr_rate: crate::types::percent(ssr as f64, state.pulls as f64),
            nominal_ssr_rate: self.config.rates()[0] * 100.0,
            spent: state.ledger.spent.to_f64(),
            current_streak: state.pity.streak,
            pulls_until_ceiling: self
                .config
                .ceiling_enabled
                .then(|| state.pity.draws_until_forced()),
            cost_per_ssr: state.ledger.cost_per_success(ssr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ConstantSource, ScriptedSource, SeededSource};

    #[test]
    fn rate_up_doubles_rare_tiers_and_shrinks_n() {
        let config = GachaConfig { rate_up: true, ..GachaConfig::default() };
        let [ssr, sr, r, n] = config.rates();
        assert_eq!(ssr, 0.02);
        assert_eq!(sr, 0.1);
        assert_eq!(r, 0.2);
        assert!((n - 0.68).abs() < 1e-12);
        assert!(Gacha::new(config).is_ok());
    }

    #[test]
    fn ceiling_forces_ssr_on_the_hundredth_pull() {
        let g = Gacha::new(GachaConfig::default()).unwrap();
        let (state, pulls) = g.pull_many(g.reset(), 100, &mut ConstantSource(0.999));
        assert!(pulls[..99].iter().all(|p| p.rarity == Rarity::N));
        assert_eq!(pulls[99], Pull { rarity: Rarity::Ssr, forced: true, streak_at_pull: 100 });
        assert_eq!(state.forced, 1);
        assert_eq!(state.pity.streak, 0);
        assert_eq!(state.ledger.spent, Yen::new(30_000));
    }

    #[test]
    fn ceiling_off_never_forces() {
        let config = GachaConfig { ceiling_enabled: false, ..GachaConfig::default() };
        let g = Gacha::new(config).unwrap();
        let (state, _) = g.pull_many(g.reset(), 300, &mut ConstantSource(0.999));
        assert_eq!(state.counts[0], 0);
        assert_eq!(state.forced, 0);
        assert_eq!(state.pity.streak, 300);
        assert_eq!(g.stats(&state).pulls_until_ceiling, None);
        assert_eq!(g.stats(&state).cost_per_ssr, None);
    }

    #[test]
    fn stats_before_any_pull() {
        let g = Gacha::new(GachaConfig::default()).unwrap();
        let stats = g.stats(&g.reset());
        assert_eq!(stats.actual_ssr_rate, None);
        assert_eq!(stats.pulls_until_ceiling, Some(100));
        assert_eq!(stats.nominal_ssr_rate, 1.0);
    }

    #[test]
    fn ceiling_lifts_observed_ssr_rate() {
        let config = GachaConfig { ceiling: 50, ..GachaConfig::default() };
        let g = Gacha::new(config).unwrap();
        let (state, _) = g.pull_many(g.reset(), 50_000, &mut SeededSource::new(8));
        let rate = g.stats(&state).actual_ssr_rate.unwrap();
        // 1 / Σ_{k<50} 0.99^k ≈ 2.53 %
        assert!(rate > 2.2 && rate < 2.9, "observed {rate}");
        assert!(state.forced > 0);
    }

    #[test]
    fn rejects_rates_over_one() {
        let config = GachaConfig { r_rate: 0.95, ..GachaConfig::default() };
        assert!(Gacha::new(config).is_err());
        let config = GachaConfig { ceiling: 0, ..GachaConfig::default() };
        assert_eq!(Gacha::new(config), Err(ConfigError::NonPositiveThreshold));
    }

    #[test]
    fn zero_ceiling_is_fine_when_switched_off() {
        let config = GachaConfig { ceiling: 0, ceiling_enabled: false, ..GachaConfig::default() };
        let g = Gacha::new(config).unwrap();
        let (state, pulls) = g.pull_many(g.reset(), 3, &mut ScriptedSource::new(vec![0.999, 0.005, 0.1]));
        let rarities: Vec<Rarity> = pulls.iter().map(|p| p.rarity).collect();
        assert_eq!(rarities, vec![Rarity::N, Rarity::Ssr, Rarity::R]);
        assert_eq!(state.forced, 0);
        assert_eq!(state.pity.streak, 1);
        assert_eq!(g.stats(&state).pulls_until_ceiling, None);
    }
}
