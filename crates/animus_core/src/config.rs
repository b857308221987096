use crate::error::AnimusError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

/// Immutable tuning constants, passed by reference into every subsystem call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimusConfig {
    pub laws: LawConfig,
    pub memory: MemoryConfig,
    pub salience: SalienceConfig,
    pub meaning: MeaningConfig,
    pub gate: GateConfig,
    pub generation: GenerationConfig,
}

impl AnimusConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: AnimusConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    /// Overrides that fail validation are discarded in favour of plain defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                match cfg.validate() {
                    Ok(()) => cfg,
                    Err(e) => {
                        tracing::warn!("Ignoring env overrides: {}", e);
                        Self::default()
                    }
                }
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ANIMUS_THRESHOLD") {
            if let Ok(n) = v.parse() {
                self.meaning.threshold = n;
            }
        }
        if let Ok(v) = std::env::var("ANIMUS_COOLDOWN_SECS") {
            if let Ok(n) = v.parse() {
                self.gate.cooldown_secs = n;
            }
        }
        if let Ok(v) = std::env::var("ANIMUS_MIN_STAKES") {
            if let Ok(n) = v.parse() {
                self.gate.min_stakes = n;
            }
        }
        if let Ok(v) = std::env::var("ANIMUS_GENERATION_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                self.generation.timeout_secs = n;
            }
        }
    }

    /// Reject values that would break the clamp invariants downstream.
    pub fn validate(&self) -> std::result::Result<(), AnimusError> {
        let m = &self.meaning;
        let weights = [
            m.salience_weight,
            m.drive_weight,
            m.arc_weight,
            m.relationship_weight,
            m.fatigue_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AnimusError::Config(
                "meaningfulness weights must be finite and non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&m.threshold) {
            return Err(AnimusError::Config(format!(
                "eligibility threshold {} outside [0, 1]",
                m.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.gate.min_stakes) {
            return Err(AnimusError::Config(format!(
                "min_stakes {} outside [0, 1]",
                self.gate.min_stakes
            )));
        }
        if self.gate.cooldown_secs < 0 {
            return Err(AnimusError::Config("cooldown_secs must be >= 0".into()));
        }
        let l = &self.laws;
        let fractions = [l.drive_drift, l.mood_decay];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(AnimusError::Config(
                "drift and decay fractions must lie in [0, 1]".into(),
            ));
        }
        let factors = [l.warmth_drift, l.tension_drift, l.familiarity_drift];
        if factors.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(AnimusError::Config(
                "relationship drift factors must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Constants of the per-cycle update laws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawConfig {
    /// Homeostatic resting level for every drive.
    pub drive_baseline: f32,
    /// Fraction of the gap to baseline closed per cycle.
    pub drive_drift: f32,
    /// Valence gain per unit of summed drive delta.
    pub mood_valence_coupling: f32,
    /// Arousal gain per unit of positive novelty delta.
    pub novelty_arousal_coupling: f32,
    /// Fraction of mood lost toward the origin per cycle.
    pub mood_decay: f32,
    pub warmth_drift: f32,
    pub tension_drift: f32,
    pub familiarity_drift: f32,
    /// Arc intensity is multiplied by `1 - decay_rate * arc_decay_scale`.
    pub arc_decay_scale: f32,
    pub arc_reinforcement: f32,
    pub intention_decay: f32,
    /// Intentions at or below this priority after decay are dropped.
    pub intention_drop_floor: f32,
    pub reminder_priority: f32,
    pub energy_depletion: f32,
    pub conflict_energy_cost: f32,
    pub work_energy_cost: f32,
}

impl Default for LawConfig {
    fn default() -> Self {
        Self {
            drive_baseline: 0.5,
            drive_drift: 0.01,
            mood_valence_coupling: 0.2,
            novelty_arousal_coupling: 0.5,
            mood_decay: 0.05,
            warmth_drift: 0.995,
            tension_drift: 0.99,
            familiarity_drift: 0.999,
            arc_decay_scale: 0.01,
            arc_reinforcement: 0.1,
            intention_decay: 0.01,
            intention_drop_floor: 0.1,
            reminder_priority: 0.8,
            energy_depletion: 0.005,
            conflict_energy_cost: 0.1,
            work_energy_cost: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Episodic memories are recorded at or above this salience.
    pub episodic_threshold: f32,
    pub distinguished_bonus: f32,
    pub deviation_bonus: f32,
    /// Distance from the drive baseline that counts as "deviated".
    pub deviation_limit: f32,
    pub incursion_bonus: f32,
    pub disclosure_salience: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            episodic_threshold: 0.6,
            distinguished_bonus: 0.2,
            deviation_bonus: 0.2,
            deviation_limit: 0.3,
            incursion_bonus: 0.3,
            disclosure_salience: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalienceConfig {
    pub physically_present: f32,
    pub nearby: f32,
    pub mentioned: f32,
    pub background_person: f32,
    /// Weight on `max(|warmth|, |trust|, tension)` for people.
    pub relationship_boost: f32,
    pub topic_base: f32,
    pub arc_topic_weight: f32,
    pub intention_topic_bonus: f32,
    /// Arcs below this intensity are not considered active.
    pub active_arc_floor: f32,
    pub critical_object: f32,
    pub important_object: f32,
    pub background_object: f32,
}

impl Default for SalienceConfig {
    fn default() -> Self {
        Self {
            physically_present: 1.0,
            nearby: 0.7,
            mentioned: 0.5,
            background_person: 0.2,
            relationship_boost: 0.3,
            topic_base: 0.5,
            arc_topic_weight: 0.3,
            intention_topic_bonus: 0.2,
            active_arc_floor: 0.05,
            critical_object: 0.9,
            important_object: 0.6,
            background_object: 0.2,
        }
    }
}

/// Weights of `M = w1·S + w2·D + w3·A + w4·R − w5·(1 − energy)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeaningConfig {
    pub salience_weight: f32,
    pub drive_weight: f32,
    pub arc_weight: f32,
    pub relationship_weight: f32,
    pub fatigue_weight: f32,
    /// Minimum M for the first eligibility factor.
    pub threshold: f32,
}

impl Default for MeaningConfig {
    fn default() -> Self {
        Self {
            salience_weight: 0.25,
            drive_weight: 0.25,
            arc_weight: 0.25,
            relationship_weight: 0.15,
            fatigue_weight: 0.10,
            threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub cooldown_secs: i64,
    pub min_stakes: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 300, // 5 minutes
            min_stakes: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Maximum prior memories recalled into the encoded context.
    pub recall_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            cache_ttl_secs: 600,
            recall_limit: 5,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
