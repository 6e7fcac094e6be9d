// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Chinchirorin

//! Three-dice rolls checked for fairness.
//!
//! Faces feed a six-category [`FrequencyTable`]; triples are compared with
//! their theoretical 1/36. The physics tray is cosmetic: faces come from
//! the random source, not from where the bodies land.

use serde::{Deserialize, Serialize};

use crate::bias::{ChiSquareReport, FrequencyTable};
use crate::dice::{face, DiceTray, PhysicsParams};
use crate::error::ConfigError;
use crate::random::RandomSource;

/// Chance that three fair dice show the same face.
pub const TRIPLE_PROBABILITY: f64 = 1.0 / 36.0;

const FACES: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChinchiroState {
    pub rolls: u64,
    pub triples: u64,
    pub faces: FrequencyTable,
    pub last: Option<[u8; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChinchiroStats {
    pub rolls: u64,
    pub face_counts: Vec<u64>,
    pub expected_per_face: Option<f64>,
    pub max_deviation: Option<f64>,
    /// Max deviation as a percentage of the expected count.
    pub deviation_rate: Option<f64>,
    pub triples: u64,
    pub triples_rate: Option<f64>,
    pub expected_triples_rate: f64,
    pub chi_square: ChiSquareReport,
}

pub fn is_triple(faces: &[u8; 3]) -> bool {
    faces[0] == faces[1] && faces[1] == faces[2]
}

/// Three faces from three samples.
pub fn roll_faces<R: RandomSource>(source: &mut R) -> [u8; 3] {
    [face(source.next_unit()), face(source.next_unit()), face(source.next_unit())]
}

pub fn reset() -> Result<ChinchiroState, ConfigError> {
    Ok(ChinchiroState {
        rolls: 0,
        triples: 0,
        faces: FrequencyTable::numbered(FACES)?,
        last: None,
    })
}

/// Record a roll whose faces were already decided.
pub fn record(state: ChinchiroState, faces: [u8; 3]) -> ChinchiroState {
    let mut table = state.faces;
    table.record_all(faces.iter().map(|&f| usize::from(f.saturating_sub(1))));
    ChinchiroState {
        rolls: state.rolls + 1,
        triples: state.triples + is_triple(&faces) as u64,
        faces: table,
        last: Some(faces),
    }
}

pub fn roll<R: RandomSource>(state: ChinchiroState, source: &mut R) -> (ChinchiroState, [u8; 3]) {
    let faces = roll_faces(source);
    (record(state, faces), faces)
}

/// Auto-roll `count` times, committing once.
pub fn roll_many<R: RandomSource>(state: ChinchiroState, count: u32, source: &mut R) -> ChinchiroState {
    (0..count).fold(state, |s, _| record(s, roll_faces(source)))
}

pub fn stats(state: &ChinchiroState) -> ChinchiroStats {
    use crate::types::percent;
    ChinchiroStats {
        rolls: state.rolls,
        face_counts: state.faces.counts().to_vec(),
        expected_per_face: state.faces.expected(),
        max_deviation: state.faces.max_deviation(),
        deviation_rate: state.faces.deviation_rate(),
        triples: state.triples,
        triples_rate: percent(state.triples as f64, state.rolls as f64),
        expected_triples_rate: TRIPLE_PROBABILITY * 100.0,
        chi_square: state.faces.chi_square(),
    }
}

/// Physics tray for the three dice in the bowl.
pub fn bowl() -> DiceTray {
    DiceTray::new(3, PhysicsParams::default())
}
