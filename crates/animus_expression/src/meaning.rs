//! MeaningfulnessScorer: folds salience and internal pressure into one score.
//!
//! `M = w1·salience_max + w2·drive_pressure_max + w3·arc_hot
//!      + w4·rel_stakes_max − w5·(1 − energy)`, clamped to `[0, 1]`.

use crate::attention::SalienceMap;
use animus_core::{Agent, MeaningConfig};
use serde::Serialize;

/// The score with every component kept for explanation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeaningfulnessScore {
    pub salience_max: f32,
    pub drive_pressure_max: f32,
    pub arc_hot: f32,
    pub rel_stakes_max: f32,
    pub energy: f32,
    pub fatigue_penalty: f32,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct MeaningfulnessScorer {
    config: MeaningConfig,
}

impl MeaningfulnessScorer {
    pub fn new(config: MeaningConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub fn score(&self, agent: &Agent, salience: &SalienceMap) -> MeaningfulnessScore {
        let w = &self.config;
        let salience_max = salience.max();
        let (_, drive_pressure_max) = agent.drives.max_level();
        let arc_hot = agent.arcs.iter().map(|a| a.intensity).fold(0.0, f32::max);
        let rel_stakes_max = agent
            .relationships
            .iter()
            .map(|e| e.stakes())
            .fold(0.0, f32::max);
        let energy = agent.energy.clamp(0.0, 1.0);
        let fatigue_penalty = w.fatigue_weight * (1.0 - energy);

        let raw = w.salience_weight * salience_max
            + w.drive_weight * drive_pressure_max
            + w.arc_weight * arc_hot
            + w.relationship_weight * rel_stakes_max
            - fatigue_penalty;

        MeaningfulnessScore {
            salience_max,
            drive_pressure_max,
            arc_hot,
            rel_stakes_max,
            energy,
            fatigue_penalty,
            score: raw.clamp(0.0, 1.0),
        }
    }
}
