#[cfg(test)]
mod tests {
    use odds_engine::bias::BiasVerdict;
    use odds_engine::chinchirorin;
    use odds_engine::claw::{ArmAnimation, ClawConfig, ClawMachine};
    use odds_engine::dice::{step, DiceBody, DiceTray, PhysicsParams};
    use odds_engine::gacha::{Gacha, GachaConfig, Rarity};
    use odds_engine::lottery::{Lottery, LotteryConfig};
    use odds_engine::slot::{SlotConfig, SlotMachine};
    use odds_engine::types::Vec3;
    use odds_engine::{
        ConstantSource, DistributionTable, Draw, Escalator, HazardModel, LineageConfig,
        LineageModel, PityTracker, RandomSource, SeededSource,
    };

    fn gacha_table() -> DistributionTable {
        DistributionTable::from_weights(&[("SSR", 0.01), ("SR", 0.05), ("R", 0.2), ("N", 0.74)])
            .unwrap()
    }

    // ========== Sampler + Pity ==========

    #[test]
    fn test_pity_ceiling_after_99_high_samples() {
        let tracker = PityTracker::new(gacha_table(), 0, 100).unwrap();
        let mut state = tracker.reset();
        let mut source = ConstantSource(0.999);

        for _ in 0..99 {
            let (next, d) = tracker.draw_from(state, &mut source);
            assert!(!d.draw.is_hit(0), "SSR drawn before the ceiling");
            state = next;
        }
        assert_eq!(state.streak, 99);

        let (state, d) = tracker.draw_from(state, &mut source);
        assert_eq!(d.draw, Draw::Hit(0));
        assert!(d.forced);
        assert_eq!(state.streak, 0);
    }

    #[test]
    fn test_sampler_frequency_bands_100k() {
        let table = gacha_table();
        let mut rng = SeededSource::new(2026);
        let mut counts = [0u64; 4];
        for _ in 0..100_000 {
            if let Draw::Hit(i) = table.sample_from(&mut rng) {
                counts[i] += 1;
            }
        }
        println!("Counts: {:?}", counts);
        let ssr = counts[0] as f64 / 100_000.0;
        assert!((0.008..=0.012).contains(&ssr), "SSR rate {ssr} outside band");
    }

    #[test]
    fn test_gacha_batch_matches_single_pulls() {
        let gacha = Gacha::new(GachaConfig::default()).unwrap();
        let (batched, _) = gacha.pull_many(gacha.reset(), 1_000, &mut SeededSource::new(5));

        let mut single = gacha.reset();
        let mut rng = SeededSource::new(5);
        for _ in 0..1_000 {
            single = gacha.pull(single, &mut rng).0;
        }
        assert_eq!(batched, single);
        assert!(batched.counts[Rarity::Ssr as usize] >= 10, "ceiling guarantees 10 SSR");
    }

    // ========== Escalator / Claw ==========

    #[test]
    fn test_claw_cost_per_prize_bounded_by_expected_value() {
        for (ev, baseline) in [(500u64, 10.0), (1_000, 5.0), (300, 30.0)] {
            let config = ClawConfig { expected_value: ev, cost_per_play: 100, baseline_grip: baseline };
            let machine = ClawMachine::new(config).unwrap();
            let (state, _) = machine.play_many(machine.reset(), 10_000, &mut SeededSource::new(ev));
            let stats = machine.stats(&state);
            let cost = stats.cost_per_prize.unwrap();
            println!("EV {ev}: cost per prize {cost:.1}, expected {:.2} plays", stats.expected_attempts);
            assert!(cost <= ev as f64 + 1.0);
        }
    }

    #[test]
    fn test_escalator_guarantee_holds_for_every_streak() {
        let e = Escalator::new(8, 0.0).unwrap();
        let mut state = e.reset();
        let mut longest = 0;
        let mut rng = SeededSource::new(77);
        for _ in 0..50_000 {
            let (next, attempt) = e.attempt_from(state, &mut rng);
            longest = longest.max(attempt.failures_before + 1);
            state = next;
        }
        assert!(longest <= 8, "needed {longest} attempts");
    }

    #[test]
    fn test_claw_animation_overwritten_by_new_play() {
        let machine = ClawMachine::new(ClawConfig::default()).unwrap();
        let (state, first) = machine.play(machine.reset(), 0.99);
        let running = ArmAnimation::start(&first).step(1_000.0);
        let (_, second) = machine.play(state, 0.0);
        let restarted = ArmAnimation::start(&second);
        assert_ne!(running.phase, restarted.phase);
        assert_eq!(restarted.elapsed_ms, 0.0);
        assert!(restarted.success);
    }

    // ========== Dice physics ==========

    #[test]
    fn test_dice_rest_on_next_tick_below_thresholds() {
        let params = PhysicsParams::default();
        let body = DiceBody {
            velocity: Vec3::new(0.0002, 0.0003, -0.0002),
            angular_velocity: Vec3::new(0.009, 0.3, -0.3),
            ..DiceBody::at(Vec3::new(2.0, params.rest_height, -1.0))
        };
        let next = step(body, &params);
        assert!(next.resting);
        assert_eq!(next.velocity, Vec3::ZERO);
        assert_eq!(next.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_dice_tray_is_deterministic_per_seed() {
        let run = |seed| {
            let mut tray = DiceTray::new(3, PhysicsParams::default());
            tray.launch(&mut SeededSource::new(seed));
            let ticks = tray.settle(50_000);
            (ticks, tray.bodies)
        };
        let (a_ticks, a) = run(99);
        let (b_ticks, b) = run(99);
        assert_eq!(a_ticks, b_ticks);
        assert_eq!(a, b);
        println!("Settled in {:?} ticks", a_ticks);
        assert!(a_ticks.is_some());
    }

    // ========== Bias detection ==========

    #[test]
    fn test_fair_dice_false_positive_rate_near_five_percent() {
        let mut rng = SeededSource::new(31);
        let trials = 400;
        let mut flagged = 0;
        for _ in 0..trials {
            let state = chinchirorin::roll_many(chinchirorin::reset().unwrap(), 100, &mut rng);
            if chinchirorin::stats(&state).chi_square.verdict == BiasVerdict::Biased {
                flagged += 1;
            }
        }
        let rate = flagged as f64 / trials as f64;
        println!("False positive rate: {rate:.3}");
        assert!(rate < 0.12, "fair dice flagged {rate}");
    }

    #[test]
    fn test_loaded_die_detected() {
        // face six twice as likely
        struct Loaded(SeededSource);
        impl RandomSource for Loaded {
            fn next_unit(&mut self) -> f64 {
                let u = self.0.next_unit();
                if u < 2.0 / 7.0 { 5.5 / 6.0 } else { (u - 2.0 / 7.0) / (5.0 / 7.0) * (5.0 / 6.0) }
            }
        }
        let mut source = Loaded(SeededSource::new(8));
        let state = chinchirorin::roll_many(chinchirorin::reset().unwrap(), 2_000, &mut source);
        let stats = chinchirorin::stats(&state);
        println!("Faces: {:?}", stats.face_counts);
        assert_eq!(stats.chi_square.verdict, BiasVerdict::Biased);
    }

    // ========== Money-losing machines ==========

    #[test]
    fn test_lottery_bulk_purchase_accounting() {
        let lottery = Lottery::new(LotteryConfig::default()).unwrap();
        let (state, purchase) = lottery.buy(lottery.reset(), 200_000, &mut SeededSource::new(1));
        let stats = lottery.stats(&state);
        println!("Return rate: {:?}", stats.return_rate);
        assert_eq!(stats.spent, 60_000_000.0);
        assert_eq!(purchase.prize_counts.iter().sum::<u64>() + purchase.losing_tickets, 200_000);

        // 7th prize: 1 in 100
        let (_, seventh) = &stats.prize_counts[7];
        assert!((1_700..=2_300).contains(seventh), "7th prize count {seventh}");
        assert!(stats.expected_value_per_ticket < 150.0);
    }

    #[test]
    fn test_slot_house_edge() {
        let machine = SlotMachine::new(SlotConfig::default()).unwrap();
        let (state, _) = machine.spin_many(machine.reset(), 100_000, &mut SeededSource::new(3));
        let stats = machine.stats(&state);
        let rtp = stats.return_rate.unwrap();
        assert!((5.0..=9.0).contains(&rtp), "return {rtp}%");
    }

    // ========== Closed-form models ==========

    #[test]
    fn test_hazard_preset_checkpoints() {
        let model = HazardModel::earth_preset();
        assert_eq!(model.cumulative(0), 0.0);
        let c100 = model.cumulative_percent(100);
        let c10k = model.cumulative_percent(10_000);
        println!("100y: {c100:.4}%  10000y: {c10k:.2}%");
        assert!(c100 < 0.2);
        assert!(c10k > 12.0);
    }

    #[test]
    fn test_lineage_collapse_before_the_cap() {
        let model = LineageModel::new(LineageConfig::default()).unwrap();
        let g = model.first_collapse_generation().unwrap();
        assert!(model.ancestors(g) < model.config().cap);
        assert!(model.series().iter().skip(g as usize).all(|p| p.collapsed));
    }

    // ========== Partial configuration ==========

    #[test]
    fn test_partial_configs_fill_in_defaults() {
        let gacha: GachaConfig = serde_json::from_str(r#"{"rate_up": true}"#).unwrap();
        assert_eq!(gacha, GachaConfig { rate_up: true, ..GachaConfig::default() });
        assert!(Gacha::new(gacha).is_ok());

        let claw: ClawConfig = serde_json::from_str(r#"{"expected_value": 1000}"#).unwrap();
        assert_eq!(claw, ClawConfig { expected_value: 1000, ..ClawConfig::default() });
        assert_eq!(ClawMachine::new(claw).unwrap().escalator().target_trials(), 10);

        let lottery: LotteryConfig = serde_json::from_str(r#"{"ticket_price": 200}"#).unwrap();
        assert_eq!(lottery.prizes, LotteryConfig::default().prizes);
        assert!(Lottery::new(lottery).is_ok());

        let slot: SlotConfig = serde_json::from_str(r#"{"tease_probability": 0.5}"#).unwrap();
        assert_eq!(slot.pay_lines, SlotConfig::default().pay_lines);

        let lineage: LineageConfig = serde_json::from_str(r#"{"cap": 1000000}"#).unwrap();
        assert_eq!(lineage.bands, LineageConfig::default().bands);

        let physics: PhysicsParams = serde_json::from_str(r#"{"friction": 0.9}"#).unwrap();
        assert_eq!(physics, PhysicsParams { friction: 0.9, ..PhysicsParams::default() });

        let empty: GachaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, GachaConfig::default());
    }

    #[test]
    fn test_partial_config_is_still_validated() {
        let gacha: GachaConfig = serde_json::from_str(r#"{"r_rate": 0.99}"#).unwrap();
        assert!(Gacha::new(gacha).is_err());
        let wrong_type: Result<GachaConfig, _> = serde_json::from_str(r#"{"ceiling": "soon"}"#);
        assert!(wrong_type.is_err());
    }
}
