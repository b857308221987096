//! Per-agent psychological state.
//!
//! An `Agent` is hydrated by the caller at cycle start, mutated only inside its
//! own processing cycle, and handed back at cycle end. Every bounded field is
//! kept in range by saturating clamps (`normalize`), never by rejection.

use crate::affect::Mood;
use crate::event::{AgentId, CounterpartRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Guard against NaN and Infinity in state values.
/// If the value is NaN or Inf, replace with the provided fallback.
#[inline]
pub fn sanitize_f32(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in state, resetting to fallback {}", fallback);
        fallback
    }
}

/// Clamp into `[0, 1]`, replacing non-finite values with `fallback`.
#[inline]
pub fn unit(v: f32, fallback: f32) -> f32 {
    sanitize_f32(v, fallback).clamp(0.0, 1.0)
}

/// Clamp into `[-1, 1]`, replacing non-finite values with `fallback`.
#[inline]
pub fn signed(v: f32, fallback: f32) -> f32 {
    sanitize_f32(v, fallback).clamp(-1.0, 1.0)
}

// =============================================================================
// Drives
// =============================================================================

/// The five persistent need channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    Relatedness,
    Autonomy,
    Competence,
    Novelty,
    Safety,
}

impl Drive {
    pub const ALL: [Drive; 5] = [
        Drive::Relatedness,
        Drive::Autonomy,
        Drive::Competence,
        Drive::Novelty,
        Drive::Safety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Drive::Relatedness => "relatedness",
            Drive::Autonomy => "autonomy",
            Drive::Competence => "competence",
            Drive::Novelty => "novelty",
            Drive::Safety => "safety",
        }
    }

    /// Plain-language noun used when the drive is put into words.
    pub fn noun(&self) -> &'static str {
        match self {
            Drive::Relatedness => "connection to others",
            Drive::Autonomy => "independence",
            Drive::Competence => "capability",
            Drive::Novelty => "stimulation",
            Drive::Safety => "safety",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    /// Current level (0.0 - 1.0), resting at 0.5
    pub level: f32,
    /// Multiplier on incoming event effects (default 1.0)
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

fn default_sensitivity() -> f32 {
    1.0
}

impl Default for DriveState {
    fn default() -> Self {
        Self {
            level: 0.5,
            sensitivity: 1.0,
        }
    }
}

/// All five drives. Missing entries deserialize to the default state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveSet(BTreeMap<Drive, DriveState>);

impl Default for DriveSet {
    fn default() -> Self {
        Self(Drive::ALL.iter().map(|d| (*d, DriveState::default())).collect())
    }
}

impl DriveSet {
    pub fn get(&self, drive: Drive) -> DriveState {
        self.0.get(&drive).copied().unwrap_or_default()
    }

    pub fn level(&self, drive: Drive) -> f32 {
        self.get(drive).level
    }

    pub fn get_mut(&mut self, drive: Drive) -> &mut DriveState {
        self.0.entry(drive).or_default()
    }

    pub fn set_level(&mut self, drive: Drive, level: f32) {
        self.get_mut(drive).level = unit(level, 0.5);
    }

    pub fn set_sensitivity(&mut self, drive: Drive, sensitivity: f32) {
        self.get_mut(drive).sensitivity = sanitize_f32(sensitivity, 1.0).max(0.0);
    }

    /// Iterate all five drives in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Drive, DriveState)> + '_ {
        Drive::ALL.iter().map(move |d| (*d, self.get(*d)))
    }

    /// Highest drive level, with the drive it belongs to.
    pub fn max_level(&self) -> (Drive, f32) {
        self.iter()
            .map(|(d, s)| (d, s.level))
            .fold((Drive::Relatedness, f32::MIN), |acc, cur| {
                if cur.1 > acc.1 {
                    cur
                } else {
                    acc
                }
            })
    }

    pub fn normalize(&mut self) {
        for drive in Drive::ALL {
            let state = self.get_mut(drive);
            state.level = unit(state.level, 0.5);
            state.sensitivity = sanitize_f32(state.sensitivity, 1.0).max(0.0);
        }
    }
}

// =============================================================================
// Relationships
// =============================================================================

/// One agent's directed stance toward a counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub target: CounterpartRef,
    /// Display name used when the edge is put into words.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub warmth: f32,
    #[serde(default)]
    pub trust: f32,
    #[serde(default)]
    pub tension: f32,
    #[serde(default)]
    pub attraction: f32,
    #[serde(default)]
    pub familiarity: f32,
    #[serde(default)]
    pub comfort: f32,
    /// Amplifies event-driven deltas by `(1 + volatility)`
    #[serde(default)]
    pub volatility: f32,
}

impl RelationshipEdge {
    pub fn new(target: CounterpartRef) -> Self {
        Self {
            target,
            name: None,
            warmth: 0.0,
            trust: 0.0,
            tension: 0.0,
            attraction: 0.0,
            familiarity: 0.0,
            comfort: 0.0,
            volatility: 0.0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("a stranger")
    }

    /// How much is at stake with this counterpart.
    pub fn stakes(&self) -> f32 {
        self.warmth.abs().max(self.trust.abs()).max(self.tension)
    }

    pub fn normalize(&mut self) {
        self.warmth = signed(self.warmth, 0.0);
        self.trust = signed(self.trust, 0.0);
        self.tension = unit(self.tension, 0.0);
        self.attraction = unit(self.attraction, 0.0);
        self.familiarity = unit(self.familiarity, 0.0);
        self.comfort = unit(self.comfort, 0.0);
        self.volatility = unit(self.volatility, 0.0);
    }
}

// =============================================================================
// Arcs
// =============================================================================

/// A slow-moving, topic-keyed emotional thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalArc {
    pub topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub intensity: f32,
    #[serde(default)]
    pub valence_bias: f32,
    /// Per-cycle decay, in percent of intensity
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
}

fn default_decay_rate() -> f32 {
    1.0
}

impl EmotionalArc {
    pub fn new(topic: impl Into<String>, keywords: &[&str], intensity: f32) -> Self {
        Self {
            topic: topic.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            intensity: unit(intensity, 0.0),
            valence_bias: 0.0,
            decay_rate: default_decay_rate(),
        }
    }

    /// Case-insensitive substring match of any keyword in `text`.
    pub fn matches_text(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .any(|k| haystack.contains(&k.to_lowercase()))
    }

    /// True if `topic` names this arc (its label or one of its keywords).
    pub fn is_about(&self, topic: &str) -> bool {
        let topic = topic.trim().to_lowercase();
        !topic.is_empty()
            && (self.topic.to_lowercase() == topic
                || self.keywords.iter().any(|k| k.to_lowercase() == topic))
    }

    pub fn normalize(&mut self) {
        self.intensity = unit(self.intensity, 0.0);
        self.valence_bias = signed(self.valence_bias, 0.0);
        self.decay_rate = sanitize_f32(self.decay_rate, 1.0).clamp(0.0, 100.0);
    }
}

// =============================================================================
// Intentions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentionKind {
    /// Externally imposed (calendar); exempt from passive decay
    Obligation,
    Avoid,
    Raise,
    Support,
    Protect,
    Distance,
}

impl IntentionKind {
    /// Kinds the generative capability may name. `Obligation` is reserved
    /// for calendar-driven intentions.
    pub const GENERATIVE: [IntentionKind; 5] = [
        IntentionKind::Avoid,
        IntentionKind::Raise,
        IntentionKind::Support,
        IntentionKind::Protect,
        IntentionKind::Distance,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obligation" => Some(Self::Obligation),
            "avoid" => Some(Self::Avoid),
            "raise" => Some(Self::Raise),
            "support" => Some(Self::Support),
            "protect" => Some(Self::Protect),
            "distance" => Some(Self::Distance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obligation => "obligation",
            Self::Avoid => "avoid",
            Self::Raise => "raise",
            Self::Support => "support",
            Self::Protect => "protect",
            Self::Distance => "distance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intention {
    pub description: String,
    pub priority: f32,
    pub horizon: Horizon,
    #[serde(rename = "type")]
    pub kind: IntentionKind,
    #[serde(default)]
    pub correlation_key: Option<String>,
}

impl Intention {
    pub fn new(kind: IntentionKind, description: impl Into<String>, priority: f32, horizon: Horizon) -> Self {
        Self {
            description: description.into(),
            priority: unit(priority, 0.5),
            horizon,
            kind,
            correlation_key: None,
        }
    }

    pub fn with_correlation_key(mut self, key: impl Into<String>) -> Self {
        self.correlation_key = Some(key.into());
        self
    }

    pub fn is_obligation(&self) -> bool {
        self.kind == IntentionKind::Obligation
    }

    pub fn normalize(&mut self) {
        self.priority = unit(self.priority, 0.5);
    }
}

// =============================================================================
// Memories
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Episodic,
    Biographical,
}

/// Created once, never mutated or deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub description: String,
    pub salience: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Personality
// =============================================================================

/// Stable trait weights (0.0 - 1.0). Changes on a much slower scale than the
/// rest of the state and is never touched by the per-cycle laws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Personality {
    pub traits: BTreeMap<String, f32>,
}

impl Personality {
    pub fn with_trait(mut self, name: impl Into<String>, strength: f32) -> Self {
        self.traits.insert(name.into(), unit(strength, 0.0));
        self
    }

    /// Traits sorted by strength (descending), ties broken by name.
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut sorted: Vec<_> = self.traits.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        sorted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        sorted
    }

    pub fn normalize(&mut self) {
        for v in self.traits.values_mut() {
            *v = unit(*v, 0.0);
        }
    }
}

// =============================================================================
// Agent
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub drives: DriveSet,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default = "default_energy")]
    pub energy: f32,
    #[serde(default)]
    pub relationships: Vec<RelationshipEdge>,
    #[serde(default)]
    pub arcs: Vec<EmotionalArc>,
    #[serde(default)]
    pub intentions: Vec<Intention>,
    #[serde(default)]
    pub memories: Vec<Memory>,
    #[serde(default)]
    pub personality: Personality,
    /// The counterpart whose involvement makes events more memorable
    /// (typically the player).
    #[serde(default)]
    pub distinguished_counterpart: Option<CounterpartRef>,
    /// When the generative capability was last consulted for this agent.
    #[serde(default)]
    pub last_invocation: Option<DateTime<Utc>>,
}

fn default_energy() -> f32 {
    1.0
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            drives: DriveSet::default(),
            mood: Mood::default(),
            energy: default_energy(),
            relationships: Vec::new(),
            arcs: Vec::new(),
            intentions: Vec::new(),
            memories: Vec::new(),
            personality: Personality::default(),
            distinguished_counterpart: None,
            last_invocation: None,
        }
    }

    pub fn self_ref(&self) -> CounterpartRef {
        CounterpartRef::Agent(self.id.clone())
    }

    pub fn edge(&self, target: &CounterpartRef) -> Option<&RelationshipEdge> {
        self.relationships.iter().find(|e| &e.target == target)
    }

    pub fn edge_mut(&mut self, target: &CounterpartRef) -> Option<&mut RelationshipEdge> {
        self.relationships.iter_mut().find(|e| &e.target == target)
    }

    /// Case-insensitive exact match on the edge's display name.
    pub fn edge_by_name_mut(&mut self, name: &str) -> Option<&mut RelationshipEdge> {
        let wanted = name.trim().to_lowercase();
        self.relationships
            .iter_mut()
            .find(|e| e.name.as_deref().map(|n| n.to_lowercase()) == Some(wanted.clone()))
    }

    pub fn is_distinguished(&self, who: &CounterpartRef) -> bool {
        self.distinguished_counterpart.as_ref() == Some(who)
    }

    /// Sanitize and clamp every bounded field.
    pub fn normalize(&mut self) {
        self.drives.normalize();
        self.mood.normalize();
        self.energy = unit(self.energy, 1.0);
        for edge in &mut self.relationships {
            edge.normalize();
        }
        for arc in &mut self.arcs {
            arc.normalize();
        }
        for intention in &mut self.intentions {
            intention.normalize();
        }
        self.personality.normalize();
    }
}
