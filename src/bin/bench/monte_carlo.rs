// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Monte Carlo Runner

use odds_engine::SeededSource;

use crate::report::*;
use crate::scenarios::{Scenario, Trial};

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(scenario: &Scenario, seed: u64, draws: u64) -> BenchResult {
    let start = Instant::now();
    let mut source = SeededSource::new(seed);
    let trial = (scenario.run)(&mut source, draws).unwrap_or_else(|e| {
        eprintln!("  {}: configuration rejected: {}", scenario.name, e);
        Trial { metric: f64::NAN, pass: false }
    });

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass: trial.pass,
        metric: trial.metric,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

/// N runs of a scenario with seeds `base_seed..base_seed + N`.
pub fn run_monte_carlo(scenario: &Scenario, n_runs: usize, base_seed: u64, draws: u64) -> MonteCarloReport {
    let results = (0..n_runs)
        .map(|i| run_single(scenario, base_seed + i as u64, draws))
        .collect();
    aggregate(scenario, results)
}

fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n == 0 { 0.0 } else { passed as f64 / n as f64 };

    let metric = Stats::from_samples(&results.iter().map(|r| r.metric).collect::<Vec<_>>());
    let elapsed_ms = Stats::from_samples(
        &results.iter().map(|r| r.elapsed_ms as f64).collect::<Vec<_>>()
    );
    let expected = scenario.expected.map(|f| f());

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        unit: scenario.unit.to_string(),
        n_runs: n,
        pass_rate,
        min_pass_rate: scenario.min_pass_rate,
        expected_in_ci: expected.map(|e| metric.covers(e)),
        metric,
        expected,
        elapsed_ms,
        individual_runs: results,
    }
}
