// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Bench Scenarios

use odds_engine::bias::BiasVerdict;
use odds_engine::claw::{ClawConfig, ClawMachine};
use odds_engine::slot::{SlotConfig, SlotMachine};
use odds_engine::{chinchirorin, tiles};
use odds_engine::{
    ConfigError, DiceTray, DistributionTable, Draw, HazardModel, LineageConfig, LineageModel, PhysicsParams,
    PityTracker, SeededSource,
};

// ─── Scenario Configuration ─────────────────────────────────────────────────

/// Outcome of one seeded run.
pub struct Trial {
    pub metric: f64,
    pub pass: bool,
}

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub unit: &'static str,
    /// Closed-form value of the metric, if there is one.
    pub expected: Option<fn() -> f64>,
    /// Fraction of runs that must pass.
    pub min_pass_rate: f64,
    pub run: fn(&mut SeededSource, u64) -> Result<Trial, ConfigError>,
}

fn gacha_table() -> Result<DistributionTable, ConfigError> {
    DistributionTable::from_weights(&[("SSR", 0.01), ("SR", 0.05), ("R", 0.2), ("N", 0.74)])
}

/// Observed proportion within `k` standard errors of `p`.
fn within_sigma(hits: u64, n: u64, p: f64, k: f64) -> bool {
    if n == 0 {
        return false;
    }
    let observed = hits as f64 / n as f64;
    let se = (p * (1.0 - p) / n as f64).sqrt();
    (observed - p).abs() <= k * se
}

// ─── Sampler + Pity ─────────────────────────────────────────────────────────

fn sampler_expected() -> f64 {
    1.0
}

fn sampler_band(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let table = gacha_table()?;
    let hits = (0..draws).filter(|_| table.sample_from(source) == Draw::Hit(0)).count() as u64;
    Ok(Trial {
        metric: hits as f64 / draws.max(1) as f64 * 100.0,
        pass: within_sigma(hits, draws, 0.01, 4.0),
    })
}

fn pity_tracker() -> Result<PityTracker, ConfigError> {
    PityTracker::new(gacha_table()?, 0, 100)
}

fn pity_window(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let tracker = pity_tracker()?;
    let mut state = tracker.reset();
    let mut longest = 0;
    for _ in 0..draws {
        let (next, d) = tracker.draw_from(state, source);
        if d.draw.is_hit(0) {
            longest = longest.max(d.streak_at_draw);
        }
        state = next;
    }
    Ok(Trial { metric: longest as f64, pass: longest <= tracker.threshold() })
}

/// `1 / Σ_{k<100} 0.99^k`, as a percentage.
fn pity_rate_expected() -> f64 {
    let mean_wait: f64 = (0..100).map(|k| 0.99f64.powi(k)).sum();
    100.0 / mean_wait
}

fn pity_rate(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let tracker = pity_tracker()?;
    let mut state = tracker.reset();
    let mut hits = 0u64;
    for _ in 0..draws {
        let (next, d) = tracker.draw_from(state, source);
        hits += d.draw.is_hit(0) as u64;
        state = next;
    }
    let rate = hits as f64 / draws.max(1) as f64 * 100.0;
    let expected = pity_rate_expected();
    Ok(Trial { metric: rate, pass: (rate - expected).abs() / expected < 0.1 })
}

// ─── Escalator ──────────────────────────────────────────────────────────────

fn claw_expected_attempts() -> f64 {
    ClawMachine::new(ClawConfig::default()).map_or(f64::NAN, |m| m.escalator().expected_attempts())
}

fn claw_attempts(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let machine = ClawMachine::new(ClawConfig::default())?;
    let count = u32::try_from(draws).unwrap_or(u32::MAX);
    let (state, _) = machine.play_many(machine.reset(), count, source);
    let per_prize = state.attempts as f64 / state.prizes.max(1) as f64;
    let expected = machine.escalator().expected_attempts();
    Ok(Trial { metric: per_prize, pass: (per_prize - expected).abs() / expected < 0.05 })
}

// ─── Dice ───────────────────────────────────────────────────────────────────

const LAUNCHES: u32 = 10;
const TICK_BUDGET: u64 = 100_000;

fn dice_time_to_rest(source: &mut SeededSource, _draws: u64) -> Result<Trial, ConfigError> {
    let mut tray = DiceTray::new(3, PhysicsParams::default());
    let mut total = 0u64;
    let mut all_settled = true;
    for _ in 0..LAUNCHES {
        tray.launch(source);
        match tray.settle(TICK_BUDGET) {
            Some(ticks) => total += ticks,
            None => all_settled = false,
        }
    }
    Ok(Trial { metric: total as f64 / LAUNCHES as f64, pass: all_settled })
}

// ─── Bias detection ─────────────────────────────────────────────────────────

const SESSIONS: u32 = 200;
const ROLLS_PER_SESSION: u32 = 100;

/// The significance level itself.
fn false_positive_expected() -> f64 {
    5.0
}

fn chi_square_false_positives(source: &mut SeededSource, _draws: u64) -> Result<Trial, ConfigError> {
    let mut flagged = 0u32;
    for _ in 0..SESSIONS {
        let state = chinchirorin::roll_many(chinchirorin::reset()?, ROLLS_PER_SESSION, source);
        flagged += chinchirorin::stats(&state).chi_square.is_biased() as u32;
    }
    let rate = flagged as f64 / SESSIONS as f64 * 100.0;
    Ok(Trial { metric: rate, pass: rate <= 10.0 })
}

/// Mean of a chi-square statistic is its degrees of freedom.
fn tile_expected() -> f64 {
    (tiles::TILE_KINDS - 1) as f64
}

fn tile_uniformity(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let count = u32::try_from(draws).unwrap_or(u32::MAX);
    let report = tiles::stats(&tiles::draw_many(tiles::reset()?, count, source)).chi_square;
    Ok(Trial {
        metric: report.chi_square.unwrap_or(f64::NAN),
        pass: report.verdict == BiasVerdict::Consistent,
    })
}

// ─── House edge ─────────────────────────────────────────────────────────────

fn slot_expected_return() -> f64 {
    SlotMachine::new(SlotConfig::default())
        .ok()
        .and_then(|m| m.theoretical_return())
        .map_or(f64::NAN, |r| r * 100.0)
}

fn slot_return(source: &mut SeededSource, draws: u64) -> Result<Trial, ConfigError> {
    let machine = SlotMachine::new(SlotConfig::default())?;
    let count = u32::try_from(draws).unwrap_or(u32::MAX);
    let (state, _) = machine.spin_many(machine.reset(), count, source);
    let rtp = machine.stats(&state).return_rate.unwrap_or(0.0);

    // five standard errors of the per-spin payout
    let config = machine.config();
    let second_moment: f64 = config
        .pay_lines
        .iter()
        .map(|l| l.probability * (l.payout as f64).powi(2))
        .sum();
    let tolerance = 5.0 * 100.0 * second_moment.sqrt() / config.cost_per_spin as f64 / (count.max(1) as f64).sqrt();
    let expected = machine.theoretical_return().unwrap_or(0.0) * 100.0;
    Ok(Trial { metric: rtp, pass: (rtp - expected).abs() <= tolerance })
}

// ─── Closed-form models ─────────────────────────────────────────────────────

fn hazard_monotonic(_source: &mut SeededSource, _draws: u64) -> Result<Trial, ConfigError> {
    let model = HazardModel::earth_preset();
    let mut previous = 0.0;
    let mut monotone = true;
    for years in 0..=10_000 {
        let p = model.cumulative(years);
        monotone &= p >= previous && p <= 1.0;
        previous = p;
    }
    Ok(Trial { metric: model.cumulative_percent(10_000), pass: monotone })
}

fn lineage_collapse(_source: &mut SeededSource, _draws: u64) -> Result<Trial, ConfigError> {
    let first = LineageModel::new(LineageConfig::default())?.first_collapse_generation();
    Ok(Trial { metric: first.map_or(f64::NAN, f64::from), pass: first.is_some() })
}

// ─── Registry ───────────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "SAMPLER_SSR_BAND",
            label: "Sampler: 1% outcome frequency",
            category: "sampler",
            unit: "%",
            expected: Some(sampler_expected),
            min_pass_rate: 0.95,
            run: sampler_band,
        },
        Scenario {
            name: "PITY_WINDOW",
            label: "Pity: longest wait for the rare outcome",
            category: "pity",
            unit: "draws",
            expected: None,
            min_pass_rate: 1.0,
            run: pity_window,
        },
        Scenario {
            name: "PITY_EFFECTIVE_RATE",
            label: "Pity: effective rare rate at ceiling 100",
            category: "pity",
            unit: "%",
            expected: Some(pity_rate_expected),
            min_pass_rate: 0.9,
            run: pity_rate,
        },
        Scenario {
            name: "CLAW_EXPECTED_ATTEMPTS",
            label: "Escalator: attempts per claw prize",
            category: "escalator",
            unit: "attempts",
            expected: Some(claw_expected_attempts),
            min_pass_rate: 0.9,
            run: claw_attempts,
        },
        Scenario {
            name: "DICE_TIME_TO_REST",
            label: "Dice: ticks until three dice rest",
            category: "dice",
            unit: "ticks",
            expected: None,
            min_pass_rate: 1.0,
            run: dice_time_to_rest,
        },
        Scenario {
            name: "CHI_SQUARE_FALSE_POSITIVE",
            label: "Bias: fair dice flagged at 5%",
            category: "bias",
            unit: "%",
            expected: Some(false_positive_expected),
            min_pass_rate: 0.9,
            run: chi_square_false_positives,
        },
        Scenario {
            name: "TILE_UNIFORMITY",
            label: "Bias: 34 tiles, chi-square statistic",
            category: "bias",
            unit: "chi2",
            expected: Some(tile_expected),
            min_pass_rate: 0.85,
            run: tile_uniformity,
        },
        Scenario {
            name: "SLOT_RETURN",
            label: "House edge: slot return to player",
            category: "house-edge",
            unit: "%",
            expected: Some(slot_expected_return),
            min_pass_rate: 0.95,
            run: slot_return,
        },
        Scenario {
            name: "HAZARD_MONOTONIC",
            label: "Hazard: cumulative risk over 10,000 years",
            category: "closed-form",
            unit: "%",
            expected: None,
            min_pass_rate: 1.0,
            run: hazard_monotonic,
        },
        Scenario {
            name: "LINEAGE_COLLAPSE",
            label: "Lineage: first collapsed generation",
            category: "closed-form",
            unit: "generation",
            expected: None,
            min_pass_rate: 1.0,
            run: lineage_collapse,
        },
    ]
}
