//! Property-based tests for the probability primitives.

use proptest::prelude::*;

use odds_engine::dice::{step, DiceBody, PhysicsParams};
use odds_engine::types::Vec3;
use odds_engine::{
    DistributionTable, Draw, Escalator, Hazard, HazardModel, LineageConfig, LineageModel,
    PityTracker, ScriptedSource, WeightedOutcome,
};

/// Strategy: 1-6 weights whose sum stays below 0.9.
fn weights_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..0.15f64, 1..=6)
}

fn table(weights: &[f64]) -> DistributionTable {
    let outcomes = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| WeightedOutcome::new(format!("o{i}"), w))
        .collect();
    DistributionTable::new(outcomes).unwrap()
}

/// Strategy: an annual probability small enough to stay well away from 1.
fn annual_strategy() -> impl Strategy<Value = f64> {
    1e-9..0.2f64
}

proptest! {
    // 1. A draw misses exactly when u is past the summed weights
    #[test]
    fn miss_iff_u_past_total(weights in weights_strategy(), u in 0.0..1.0f64) {
        let t = table(&weights);
        let draw = t.sample(u);
        prop_assert_eq!(draw == Draw::Miss, u >= t.total_weight(), "u={} total={}", u, t.total_weight());
    }

    // 2. A hit lands in the outcome whose cumulative window holds u
    #[test]
    fn hit_lands_in_its_window(weights in weights_strategy(), u in 0.0..1.0f64) {
        let t = table(&weights);
        if let Draw::Hit(i) = t.sample(u) {
            let below: f64 = weights[..i].iter().sum();
            prop_assert!(weights[i] > 0.0);
            prop_assert!(u >= below - 1e-12 && u < below + weights[i] + 1e-12);
        }
    }

    // 3. The rare outcome never waits longer than the threshold
    #[test]
    fn pity_never_exceeds_threshold(
        threshold in 1u32..60,
        samples in prop::collection::vec(0.0..1.0f64, 1..400),
    ) {
        let tracker = PityTracker::new(table(&[0.02, 0.3]), 0, threshold).unwrap();
        let mut state = tracker.reset();
        let mut source = ScriptedSource::new(samples.clone());
        for _ in 0..samples.len() {
            let (next, d) = tracker.draw_from(state, &mut source);
            prop_assert!(d.streak_at_draw <= threshold);
            prop_assert!(next.streak < threshold);
            if d.forced {
                prop_assert_eq!(d.streak_at_draw, threshold);
                prop_assert_eq!(d.draw, Draw::Hit(0));
            }
            state = next;
        }
    }

    // 4. Escalation is monotone, starts at the baseline and ends guaranteed
    #[test]
    fn escalator_schedule_shape(n in 2u64..500, p0 in 0.0..=100.0f64) {
        let e = Escalator::new(n, p0).unwrap();
        prop_assert_eq!(e.probability(0), p0);
        prop_assert_eq!(e.probability(n - 1), 100.0);
        for f in 1..n {
            prop_assert!(e.probability(f) >= e.probability(f - 1));
        }
        prop_assert!(e.expected_attempts() >= 1.0 && e.expected_attempts() <= n as f64);
    }

    // 5. A failure is never followed by a lower chance
    #[test]
    fn escalator_failure_never_lowers_chance(n in 2u64..50, p0 in 0.0..100.0f64, u in 0.0..1.0f64) {
        let e = Escalator::new(n, p0).unwrap();
        let (state, attempt) = e.attempt(e.reset(), u);
        if !attempt.success {
            prop_assert!(e.probability(state.failure_count) >= attempt.probability);
        } else {
            prop_assert_eq!(state.failure_count, 0);
        }
    }

    // 6. Cumulative hazard is monotone in the horizon and bounded
    #[test]
    fn hazard_monotone(a in annual_strategy(), years in 0u64..100_000) {
        let m = HazardModel::new(vec![Hazard::new("x", a)]).unwrap();
        let now = m.cumulative(years);
        let later = m.cumulative(years + 1);
        prop_assert!((0.0..=1.0).contains(&now));
        prop_assert!(later >= now);
    }

    // 7. years_to_reach is the first horizon reaching the target
    #[test]
    fn years_to_reach_is_minimal(a in 0.001..0.2f64, target in 0.01..0.99f64) {
        let m = HazardModel::new(vec![Hazard::new("x", a)]).unwrap();
        let n = m.years_to_reach(target).unwrap();
        prop_assert!(m.cumulative(n) >= target);
        prop_assert!(n == 0 || m.cumulative(n - 1) < target);
    }

    // 8. Ancestors double until capped; collapse means ancestors exceed population
    #[test]
    fn lineage_doubling_and_collapse(g in 0u32..70) {
        let model = LineageModel::new(LineageConfig::default()).unwrap();
        let cap = model.config().cap;
        prop_assert_eq!(model.ancestors(g + 1), model.ancestors(g).saturating_mul(2).min(cap));
        let p = model.point(g);
        prop_assert_eq!(p.collapsed, p.ancestors > p.population);
    }

    // 9. A die lying on the floor below both thresholds rests after one tick
    #[test]
    fn slow_die_on_floor_rests(
        vx in -0.0003..0.0003f64, vy in -0.0003..0.0003f64, vz in -0.0003..0.0003f64,
        wx in -0.01..0.01f64, x in -3.0..3.0f64, z in -3.0..3.0f64,
    ) {
        let params = PhysicsParams::default();
        let body = DiceBody {
            velocity: Vec3::new(vx, vy, vz),
            angular_velocity: Vec3::new(wx, 0.0, 0.0),
            ..DiceBody::at(Vec3::new(x, params.rest_height, z))
        };
        let next = step(body, &params);
        prop_assert!(next.resting);
        prop_assert_eq!(next.position.y, params.rest_height);
        prop_assert_eq!(step(next, &params), next);
    }
}
