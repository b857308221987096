//! EligibilityGate: decides whether the generative capability is consulted.
//!
//! Four factors, all required:
//! 1. meaningfulness at or above threshold
//! 2. the cycle's significance is not trivial
//! 3. the cooldown since the last invocation has elapsed
//! 4. at least one behavioral choice carries enough stakes
//!
//! Whether a human is involved is deliberately not a factor of its own; it can
//! only matter through salience, significance or stakes.

use crate::meaning::MeaningfulnessScore;
use animus_core::{AnimusConfig, Significance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An enumerated decision point the agent is facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralChoice {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// 0.0 - 1.0
    pub stakes: f32,
}

impl BehavioralChoice {
    pub fn new(id: impl Into<String>, description: impl Into<String>, stakes: f32) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            stakes,
        }
    }
}

/// The gate's verdict with all four factors and their inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub meaningful: bool,
    pub non_trivial: bool,
    pub cooled_down: bool,
    pub has_stakes: bool,

    pub meaningfulness: f32,
    pub threshold: f32,
    pub significance: Significance,
    /// `None` when the agent was never invoked.
    pub elapsed_secs: Option<i64>,
    pub cooldown_secs: i64,
    pub max_stakes: f32,
    pub min_stakes: f32,

    /// Every failing factor, in factor order.
    pub reasons: Vec<String>,
}

impl EligibilityResult {
    /// All failing reasons joined into one line.
    pub fn reason(&self) -> String {
        self.reasons.join("; ")
    }
}

#[derive(Debug, Clone)]
pub struct EligibilityGate {
    threshold: f32,
    cooldown_secs: i64,
    min_stakes: f32,
}

impl Default for EligibilityGate {
    fn default() -> Self {
        Self::from_config(&AnimusConfig::default())
    }
}

impl EligibilityGate {
    pub fn from_config(config: &AnimusConfig) -> Self {
        Self {
            threshold: config.meaning.threshold,
            cooldown_secs: config.gate.cooldown_secs,
            min_stakes: config.gate.min_stakes,
        }
    }

    pub fn evaluate(
        &self,
        meaning: &MeaningfulnessScore,
        significance: Significance,
        choices: &[BehavioralChoice],
        last_invocation: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> EligibilityResult {
        let mut reasons = Vec::new();

        let meaningful = meaning.score >= self.threshold;
        if !meaningful {
            reasons.push(format!(
                "meaningfulness {:.2} below threshold {:.2}",
                meaning.score, self.threshold
            ));
        }

        let non_trivial = significance != Significance::Trivial;
        if !non_trivial {
            reasons.push("events are trivial".to_string());
        }

        let elapsed_secs = last_invocation.map(|t| (now - t).num_seconds());
        let cooled_down = match elapsed_secs {
            None => true,
            Some(secs) => secs >= self.cooldown_secs,
        };
        if let (false, Some(secs)) = (cooled_down, elapsed_secs) {
            reasons.push(format!(
                "cooldown: {}s since last invocation, {}s required",
                secs, self.cooldown_secs
            ));
        }

        let max_stakes = choices
            .iter()
            .map(|c| if c.stakes.is_finite() { c.stakes.clamp(0.0, 1.0) } else { 0.0 })
            .fold(0.0, f32::max);
        let has_stakes = choices.iter().any(|c| c.stakes.is_finite() && c.stakes >= self.min_stakes);
        if !has_stakes {
            if choices.is_empty() {
                reasons.push("no behavioral choices".to_string());
            } else {
                reasons.push(format!(
                    "highest choice stakes {:.2} below {:.2}",
                    max_stakes, self.min_stakes
                ));
            }
        }

        let eligible = meaningful && non_trivial && cooled_down && has_stakes;
        if eligible {
            tracing::info!("gate: eligible (M={:.2}, {})", meaning.score, significance.as_str());
        } else {
            tracing::debug!("gate: ineligible: {}", reasons.join("; "));
        }

        EligibilityResult {
            eligible,
            meaningful,
            non_trivial,
            cooled_down,
            has_stakes,
            meaningfulness: meaning.score,
            threshold: self.threshold,
            significance,
            elapsed_secs,
            cooldown_secs: self.cooldown_secs,
            max_stakes,
            min_stakes: self.min_stakes,
            reasons,
        }
    }
}
