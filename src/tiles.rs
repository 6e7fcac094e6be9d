// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Tile Draw

//! Uniform draws over the 34 distinct mahjong tiles. Short runs look
//! streaky; the chi-square verdict shows they are not.

use serde::{Deserialize, Serialize};

use crate::bias::{ChiSquareReport, FrequencyTable};
use crate::error::ConfigError;
use crate::random::RandomSource;

/// Tile names: characters, dots, bamboo, winds, dragons.
pub fn tile_names() -> Vec<String> {
    let suited = ["m", "p", "s"]
        .iter()
        .flat_map(|suit| (1..=9).map(move |n| format!("{n}{suit}")));
    let honours = ["East", "South", "West", "North", "White", "Green", "Red"]
        .iter()
        .map(|h| h.to_string());
    suited.chain(honours).collect()
}

pub const TILE_KINDS: usize = 34;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileState {
    pub counts: FrequencyTable,
    pub last: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileStats {
    pub trials: u64,
    pub expected_per_tile: Option<f64>,
    pub max_deviation: Option<f64>,
    pub deviation_rate: Option<f64>,
    /// Most and least drawn tiles, by name.
    pub most_drawn: Option<(String, u64)>,
    pub least_drawn: Option<(String, u64)>,
    pub chi_square: ChiSquareReport,
}

pub fn reset() -> Result<TileState, ConfigError> {
    Ok(TileState { counts: FrequencyTable::new(tile_names())?, last: None })
}

pub fn draw<R: RandomSource>(state: TileState, source: &mut R) -> (TileState, usize) {
    let tile = source.next_index(TILE_KINDS);
    let mut counts = state.counts;
    counts.record(tile);
    (TileState { counts, last: Some(tile) }, tile)
}

pub fn draw_many<R: RandomSource>(state: TileState, count: u32, source: &mut R) -> TileState {
    let mut counts = state.counts;
    let mut last = state.last;
    for _ in 0..count {
        let tile = source.next_index(TILE_KINDS);
        counts.record(tile);
        last = Some(tile);
    }
    TileState { counts, last }
}

pub fn stats(state: &TileState) -> TileStats {
    let t = &state.counts;
    let named = |i: usize| (t.labels()[i].clone(), t.counts()[i]);
    let extreme = |pick_max: bool| {
        if t.total() == 0 {
            return None;
        }
        let indices = 0..t.categories();
        let i = if pick_max {
            indices.max_by_key(|&i| t.counts()[i])
        } else {
            indices.min_by_key(|&i| t.counts()[i])
        };
        i.map(named)
    };
    TileStats {
        trials: t.total(),
        expected_per_tile: t.expected(),
        max_deviation: t.max_deviation(),
        deviation_rate: t.deviation_rate(),
        most_drawn: extreme(true),
        least_drawn: extreme(false),
        chi_square: t.chi_square(),
    }
}
