// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Bench Runner
//
// Usage:
//   cargo run --release --features bench --bin bench                 # All scenarios, 30 runs each
//   cargo run --release --features bench --bin bench -- --runs 5     # Quick mode
//   cargo run --release --features bench --bin bench -- pity         # Filter by name or category
//   cargo run --release --features bench --bin bench -- --seed 42    # Custom base seed

mod monte_carlo;
mod report;
mod scenarios;

use clap::Parser;
use report::*;
use scenarios::*;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "bench")]
#[command(about = "Seeded Monte Carlo checks of the probability primitives")]
struct Cli {
    /// Runs per scenario, seeds `seed..seed + runs`.
    #[arg(long, default_value_t = 30)]
    runs: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Draws per run for the sampling scenarios.
    #[arg(long, default_value_t = 100_000)]
    draws: u64,

    #[arg(long, default_value = "benchmark-results")]
    out: PathBuf,

    /// Substring of a scenario name, label or category.
    filter: Option<String>,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    println!("\n  Odds Lab Bench v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Draws/run: {} | Base seed: {}",
        cli.runs, cli.draws, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<44} {:>5} {:>20} {:>12} {:>7}",
        "Scenario", "Pass%", "Mean ± CI", "Expected", "Time");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, cli.draws);

        let half_ci = (report.metric.ci_upper - report.metric.ci_lower) / 2.0;
        let expected = report.expected.map_or_else(|| "-".to_string(), |e| format!("{e:.4}"));
        let status = if report.passed() { "PASS" } else { "FAIL" };

        println!("  {:<44} {:>4}% {:>12.4}±{:<7.4} {:>12} {:>5.0}ms  {}",
            report.label,
            (report.pass_rate * 100.0) as u32,
            report.metric.mean, half_ci,
            expected,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.passed()).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        draws_per_run: cli.draws,
        base_seed: cli.seed,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    std::fs::create_dir_all(&cli.out)?;
    let path = cli.out.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
