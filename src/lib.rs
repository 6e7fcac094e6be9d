// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab")

pub mod error;
pub mod random;
pub mod types;
pub mod ledger;

pub mod sampler;
pub mod pity;
pub mod escalator;
pub mod dice;
pub mod bias;
pub mod hazard;
pub mod lineage;

// Demonstrations built on the core
pub mod lottery;
pub mod gacha;
pub mod claw;
pub mod slot;
pub mod chinchirorin;
pub mod tiles;
pub mod janken;

pub use error::ConfigError;
pub use random::{ConstantSource, RandomSource, ScriptedSource, SeededSource};
pub use sampler::{DistributionTable, Draw, WeightedOutcome};
pub use pity::{PityDraw, PityState, PityTracker};
pub use escalator::{Attempt, EscalationState, Escalator};
pub use dice::{DiceBody, DiceTray, PhysicsParams};
pub use bias::{BiasVerdict, ChiSquareReport, FrequencyTable};
pub use hazard::{Hazard, HazardModel};
pub use lineage::{LineageConfig, LineageModel, LineagePoint};

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

pub(crate) fn console_log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    log(msg);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

/// `undefined`/`null` selects the default configuration.
fn parse_config<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        console_log(&format!("[odds-engine] unreadable configuration: {e}"));
        JsError::new(&e.to_string())
    })
}

fn rejected(e: ConfigError) -> JsError {
    console_log(&format!("[odds-engine] rejected configuration: {e}"));
    JsError::new(&e.to_string())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ─── Lottery ────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct LotterySim {
    lottery: lottery::Lottery,
    state: lottery::LotteryState,
    rng: SeededSource,
}

#[wasm_bindgen]
impl LotterySim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config: JsValue) -> Result<LotterySim, JsError> {
        install_panic_hook();
        let lottery = lottery::Lottery::new(parse_config(config)?).map_err(rejected)?;
        let state = lottery.reset();
        Ok(Self { lottery, state, rng: SeededSource::new(seed as u64) })
    }

    pub fn buy(&mut self, count: u32) -> JsValue {
        let state = std::mem::replace(&mut self.state, self.lottery.reset());
        let (state, purchase) = self.lottery.buy(state, count as u64, &mut self.rng);
        self.state = state;
        to_js(&purchase)
    }

    pub fn pray(&mut self, level: u8) {
        let state = std::mem::replace(&mut self.state, self.lottery.reset());
        self.state = self.lottery.pray(state, level);
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&self.lottery.stats(&self.state))
    }

    pub fn reset(&mut self) {
        self.state = self.lottery.reset();
    }
}

// ─── Gacha ──────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct GachaSim {
    gacha: gacha::Gacha,
    state: gacha::GachaState,
    rng: SeededSource,
}

#[wasm_bindgen]
impl GachaSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config: JsValue) -> Result<GachaSim, JsError> {
        install_panic_hook();
        let gacha = gacha::Gacha::new(parse_config(config)?).map_err(rejected)?;
        let state = gacha.reset();
        Ok(Self { gacha, state, rng: SeededSource::new(seed as u64) })
    }

    pub fn pull(&mut self, count: u32) -> JsValue {
        let (state, pulls) = self.gacha.pull_many(self.state, count, &mut self.rng);
        self.state = state;
        to_js(&pulls)
    }

    /// Swap banner settings, keeping the pull history and current streak.
    pub fn configure(&mut self, config: JsValue) -> Result<(), JsError> {
        let gacha = gacha::Gacha::new(parse_config(config)?).map_err(rejected)?;
        self.state.pity.threshold = gacha.reset().pity.threshold;
        self.gacha = gacha;
        Ok(())
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&self.gacha.stats(&self.state))
    }

    pub fn reset(&mut self) {
        self.state = self.gacha.reset();
    }
}

// ─── Claw machine ───────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct ClawSim {
    machine: claw::ClawMachine,
    state: claw::ClawState,
    animation: Option<claw::ArmAnimation>,
    rng: SeededSource,
}

#[wasm_bindgen]
impl ClawSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config: JsValue) -> Result<ClawSim, JsError> {
        install_panic_hook();
        let machine = claw::ClawMachine::new(parse_config(config)?).map_err(rejected)?;
        let state = machine.reset();
        Ok(Self { machine, state, animation: None, rng: SeededSource::new(seed as u64) })
    }

    /// Make a play and start its arm animation. Replaces any animation
    /// still running.
    pub fn play(&mut self) -> JsValue {
        let (state, play) = self.machine.play_from(self.state, &mut self.rng);
        self.state = state;
        self.animation = Some(claw::ArmAnimation::start(&play));
        to_js(&play)
    }

    pub fn auto_play(&mut self, count: u32) -> JsValue {
        let (state, plays) = self.machine.play_many(self.state, count, &mut self.rng);
        self.state = state;
        self.animation = None;
        to_js(&plays)
    }

    /// Advance the arm by `dt_ms` and return its pose, or `null` when idle.
    pub fn tick(&mut self, dt_ms: f64) -> JsValue {
        match self.animation.map(|a| a.step(dt_ms)) {
            Some(anim) => {
                self.animation = (!anim.is_done()).then_some(anim);
                to_js(&anim.pose())
            }
            None => JsValue::NULL,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&self.machine.stats(&self.state))
    }

    pub fn reset(&mut self) {
        self.state = self.machine.reset();
        self.animation = None;
    }
}

// ─── Slot machine ───────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct SlotSim {
    machine: slot::SlotMachine,
    state: slot::SlotState,
    rng: SeededSource,
}

#[wasm_bindgen]
impl SlotSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config: JsValue) -> Result<SlotSim, JsError> {
        install_panic_hook();
        let machine = slot::SlotMachine::new(parse_config(config)?).map_err(rejected)?;
        let state = machine.reset();
        Ok(Self { machine, state, rng: SeededSource::new(seed as u64) })
    }

    pub fn spin(&mut self) -> JsValue {
        let (state, spin) = self.machine.spin(self.state, &mut self.rng);
        self.state = state;
        to_js(&spin)
    }

    pub fn auto_spin(&mut self, count: u32) -> JsValue {
        let (state, spins) = self.machine.spin_many(self.state, count, &mut self.rng);
        self.state = state;
        to_js(&spins)
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&self.machine.stats(&self.state))
    }

    pub fn reset(&mut self) {
        self.state = self.machine.reset();
    }
}

// ─── Chinchirorin ───────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct ChinchiroSim {
    state: chinchirorin::ChinchiroState,
    bowl: DiceTray,
    rng: SeededSource,
}

#[wasm_bindgen]
impl ChinchiroSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<ChinchiroSim, JsError> {
        install_panic_hook();
        Ok(Self {
            state: chinchirorin::reset().map_err(rejected)?,
            bowl: chinchirorin::bowl(),
            rng: SeededSource::new(seed as u64),
        })
    }

    /// Decide the faces and throw the dice into the bowl.
    pub fn roll(&mut self) -> JsValue {
        let (state, faces) = chinchirorin::roll(self.state.clone(), &mut self.rng);
        self.state = state;
        self.bowl.launch(&mut self.rng);
        to_js(&faces)
    }

    pub fn auto_roll(&mut self, count: u32) {
        let state = self.state.clone();
        self.state = chinchirorin::roll_many(state, count, &mut self.rng);
    }

    /// One physics tick for every die in the bowl.
    pub fn tick(&mut self) -> JsValue {
        self.bowl.step();
        to_js(&self.bowl.bodies)
    }

    pub fn is_settled(&self) -> bool {
        self.bowl.all_resting()
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&chinchirorin::stats(&self.state))
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        self.state = chinchirorin::reset().map_err(rejected)?;
        self.bowl = chinchirorin::bowl();
        Ok(())
    }
}

// ─── Tiles and janken ───────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct TileSim {
    state: tiles::TileState,
    rng: SeededSource,
}

#[wasm_bindgen]
impl TileSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<TileSim, JsError> {
        install_panic_hook();
        Ok(Self { state: tiles::reset().map_err(rejected)?, rng: SeededSource::new(seed as u64) })
    }

    pub fn draw(&mut self, count: u32) {
        let state = self.state.clone();
        self.state = tiles::draw_many(state, count, &mut self.rng);
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&tiles::stats(&self.state))
    }

    pub fn get_counts(&self) -> JsValue {
        to_js(self.state.counts.counts())
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        self.state = tiles::reset().map_err(rejected)?;
        Ok(())
    }
}

#[wasm_bindgen]
pub struct JankenSim {
    mode: janken::CpuMode,
    round_state: janken::MatchState,
    streaks: janken::DrawStreakState,
    rng: SeededSource,
}

#[wasm_bindgen]
impl JankenSim {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        install_panic_hook();
        Self {
            mode: janken::CpuMode::default(),
            round_state: janken::MatchState::default(),
            streaks: janken::DrawStreakState::default(),
            rng: SeededSource::new(seed as u64),
        }
    }

    pub fn set_fair(&mut self, fair: bool, delay_ms: u32) {
        self.mode = if fair {
            janken::CpuMode::Fair
        } else {
            janken::CpuMode::LateThrow { delay_ms }
        };
    }

    /// `hand`: 0 rock, 1 scissors, 2 paper.
    pub fn play(&mut self, hand: u8) -> JsValue {
        let player = janken::Hand::ALL[usize::from(hand) % 3];
        let (state, round) = janken::play_round(self.round_state, self.mode, player, &mut self.rng);
        self.round_state = state;
        to_js(&round)
    }

    /// Two random players, `count` times.
    pub fn play_pairs(&mut self, count: u32) -> JsValue {
        self.streaks = janken::play_random_pairs(self.streaks, count, &mut self.rng);
        to_js(&self.streaks)
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(&janken::match_stats(&self.round_state))
    }

    pub fn reset(&mut self) {
        self.round_state = janken::MatchState::default();
        self.streaks = janken::DrawStreakState::default();
    }
}

#[wasm_bindgen]
pub fn draw_streak_probability(n: u32) -> f64 {
    janken::draw_streak_probability(n)
}

// ─── Closed-form models ─────────────────────────────────────────────────────

/// Checkpoint table for a hazard list, or the built-in preset when `hazards`
/// is `undefined`.
#[wasm_bindgen]
pub fn hazard_checkpoints(hazards: JsValue, years: Vec<u32>) -> Result<JsValue, JsError> {
    let model = if hazards.is_undefined() || hazards.is_null() {
        HazardModel::earth_preset()
    } else {
        let list: Vec<Hazard> = serde_wasm_bindgen::from_value(hazards)
            .map_err(|e| JsError::new(&e.to_string()))?;
        HazardModel::new(list).map_err(rejected)?
    };
    let years: Vec<u64> = if years.is_empty() {
        hazard::DEFAULT_CHECKPOINTS.to_vec()
    } else {
        years.into_iter().map(u64::from).collect()
    };
    Ok(to_js(&model.checkpoints(&years)))
}

#[wasm_bindgen]
pub fn lineage_series(config: JsValue) -> Result<JsValue, JsError> {
    let model = LineageModel::new(parse_config(config)?).map_err(rejected)?;
    Ok(to_js(&model.series()))
}

#[wasm_bindgen]
pub fn lineage_point(generation: u32) -> Result<JsValue, JsError> {
    let model = LineageModel::new(LineageConfig::default()).map_err(rejected)?;
    Ok(to_js(&model.point(generation)))
}

#[wasm_bindgen]
pub fn famous_past_life_percent(famous: u32, ever_lived: f64) -> Option<f64> {
    lineage::famous_past_life_percent(u64::from(famous), ever_lived.max(0.0) as u64)
}
