// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Exponential Lineage Model

//! Doubling ancestor counts against historical population.
//!
//! `ancestors(g) = min(2^g, cap)`. Generation `g` is dated
//! `reference_year − g · years_per_generation` and looked up in a step
//! table of population bands. Pedigree collapse is `ancestors > population`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// `(from_year, population)`: the first band whose year the era reaches wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationBand {
    pub from_year: i64,
    pub population: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub cap: u64,
    pub years_per_generation: i64,
    pub reference_year: i64,
    /// Bands in descending `from_year` order.
    pub bands: Vec<PopulationBand>,
    /// Population before the earliest band.
    pub fallback_population: u64,
    pub max_generation: u32,
}

impl Default for LineageConfig {
    fn default() -> Self {
        let band = |from_year, population| PopulationBand { from_year, population };
        Self {
            cap: 1_000_000_000_000,
            years_per_generation: 30,
            reference_year: 2024,
            bands: vec![
                band(1900, 50_000_000),
                band(1700, 30_000_000),
                band(1500, 10_000_000),
                band(1200, 5_000_000),
                band(1000, 4_000_000),
                band(800, 3_000_000),
            ],
            fallback_population: 2_000_000,
            max_generation: 40,
        }
    }
}

/// How the ancestor/population comparison is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Ratio {
    /// Ancestors outnumber the population by this factor.
    Multiple(f64),
    /// Ancestors as a percentage of the population.
    Percent(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineagePoint {
    pub generation: u32,
    pub year: i64,
    pub ancestors: u64,
    pub population: u64,
    pub collapsed: bool,
    pub ratio: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageModel {
    config: LineageConfig,
}

impl LineageModel {
    pub fn new(config: LineageConfig) -> Result<Self, ConfigError> {
        if config.cap == 0 {
            return Err(ConfigError::NonPositiveParameter("cap"));
        }
        if config.years_per_generation <= 0 {
            return Err(ConfigError::NonPositiveParameter("years_per_generation"));
        }
        if config.fallback_population == 0 || config.bands.iter().any(|b| b.population == 0) {
            return Err(ConfigError::NonPositiveParameter("population"));
        }
        let mut bands = config.bands;
        bands.sort_by(|a, b| b.from_year.cmp(&a.from_year));
        Ok(Self { config: LineageConfig { bands, ..config } })
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    pub fn ancestors(&self, generation: u32) -> u64 {
        1u64.checked_shl(generation).map_or(self.config.cap, |a| a.min(self.config.cap))
    }

    pub fn year(&self, generation: u32) -> i64 {
        self.config.reference_year - generation as i64 * self.config.years_per_generation
    }

    pub fn population(&self, generation: u32) -> u64 {
        let year = self.year(generation);
        self.config
            .bands
            .iter()
            .find(|b| year >= b.from_year)
            .map_or(self.config.fallback_population, |b| b.population)
    }

    pub fn point(&self, generation: u32) -> LineagePoint {
        let ancestors = self.ancestors(generation);
        let population = self.population(generation);
        let collapsed = ancestors > population;
        let r = ancestors as f64 / population as f64;
        LineagePoint {
            generation,
            year: self.year(generation),
            ancestors,
            population,
            collapsed,
            ratio: if collapsed { Ratio::Multiple(r) } else { Ratio::Percent(r * 100.0) },
        }
    }

    /// Points for generations `0..=max_generation`.
    pub fn series(&self) -> Vec<LineagePoint> {
        (0..=self.config.max_generation).map(|g| self.point(g)).collect()
    }

    pub fn first_collapse_generation(&self) -> Option<u32> {
        (0..=self.config.max_generation).find(|&g| self.point(g).collapsed)
    }
}

/// Odds (percent) that a past life belonged to one of `famous` people out of
/// `ever_lived` humans.
pub fn famous_past_life_percent(famous: u64, ever_lived: u64) -> Option<f64> {
    crate::types::percent(famous as f64, ever_lived as f64)
}
