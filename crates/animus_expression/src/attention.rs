//! SalienceEngine: per-category attention scores.
//!
//! Every category yields `id -> salience` in `[0, 1]`. Drives and arcs use a
//! `x^1.5` curve so low values fade while high values keep their weight.

use animus_core::{Agent, CounterpartRef, SalienceConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How close a person is to the agent this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    PhysicallyPresent,
    Nearby,
    Mentioned,
    Background,
}

/// How much an object matters to what is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Critical,
    Important,
    Background,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonInView {
    pub who: CounterpartRef,
    pub proximity: Proximity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInView {
    pub id: String,
    pub relevance: Relevance,
}

/// What the agent can perceive this cycle, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionContext {
    pub people: Vec<PersonInView>,
    pub topics: Vec<String>,
    pub objects: Vec<ObjectInView>,
}

impl PerceptionContext {
    pub fn with_person(mut self, who: CounterpartRef, proximity: Proximity) -> Self {
        self.people.push(PersonInView { who, proximity });
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    pub fn with_object(mut self, id: impl Into<String>, relevance: Relevance) -> Self {
        self.objects.push(ObjectInView {
            id: id.into(),
            relevance,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalienceMap {
    pub people: BTreeMap<String, f32>,
    pub topics: BTreeMap<String, f32>,
    pub objects: BTreeMap<String, f32>,
    pub drives: BTreeMap<String, f32>,
    pub arcs: BTreeMap<String, f32>,
}

impl SalienceMap {
    fn categories(&self) -> [(&'static str, &BTreeMap<String, f32>); 5] {
        [
            ("person", &self.people),
            ("topic", &self.topics),
            ("object", &self.objects),
            ("drive", &self.drives),
            ("arc", &self.arcs),
        ]
    }

    /// Maximum across every category; 0.0 when everything is empty.
    pub fn max(&self) -> f32 {
        self.categories()
            .iter()
            .flat_map(|(_, m)| m.values().copied())
            .fold(0.0, f32::max)
    }

    /// The single most salient item as `(category, id, score)`.
    /// Ties go to the first category, then the lowest id.
    pub fn focus(&self) -> Option<(&'static str, &str, f32)> {
        let mut best: Option<(&'static str, &str, f32)> = None;
        for (category, map) in self.categories() {
            for (id, score) in map {
                if best.map_or(true, |(_, _, b)| *score > b) {
                    best = Some((category, id.as_str(), *score));
                }
            }
        }
        best
    }
}

fn curve(x: f32) -> f32 {
    x.clamp(0.0, 1.0).powf(1.5)
}

#[derive(Debug, Clone, Default)]
pub struct SalienceEngine {
    config: SalienceConfig,
}

impl SalienceEngine {
    pub fn new(config: SalienceConfig) -> Self {
        Self { config }
    }

    fn proximity_base(&self, p: Proximity) -> f32 {
        match p {
            Proximity::PhysicallyPresent => self.config.physically_present,
            Proximity::Nearby => self.config.nearby,
            Proximity::Mentioned => self.config.mentioned,
            Proximity::Background => self.config.background_person,
        }
    }

    fn relevance_base(&self, r: Relevance) -> f32 {
        match r {
            Relevance::Critical => self.config.critical_object,
            Relevance::Important => self.config.important_object,
            Relevance::Background => self.config.background_object,
        }
    }

    pub fn score(&self, agent: &Agent, perception: &PerceptionContext) -> SalienceMap {
        let mut map = SalienceMap::default();

        for person in &perception.people {
            let mut score = self.proximity_base(person.proximity);
            if let Some(edge) = agent.edge(&person.who) {
                score += self.config.relationship_boost * edge.stakes();
            }
            let entry = map.people.entry(person.who.to_string()).or_insert(0.0);
            *entry = entry.max(score.clamp(0.0, 1.0));
        }

        for topic in &perception.topics {
            let mut score = self.config.topic_base;
            let arc_boost = agent
                .arcs
                .iter()
                .filter(|a| a.intensity >= self.config.active_arc_floor && a.is_about(topic))
                .map(|a| self.config.arc_topic_weight * curve(a.intensity))
                .fold(0.0, f32::max);
            score += arc_boost;

            let needle = topic.trim().to_lowercase();
            if !needle.is_empty() {
                let matching = agent
                    .intentions
                    .iter()
                    .filter(|i| i.description.to_lowercase().contains(&needle))
                    .count();
                score += self.config.intention_topic_bonus * matching as f32;
            }
            map.topics.insert(topic.clone(), score.clamp(0.0, 1.0));
        }

        for object in &perception.objects {
            let score = self.relevance_base(object.relevance);
            let entry = map.objects.entry(object.id.clone()).or_insert(0.0);
            *entry = entry.max(score.clamp(0.0, 1.0));
        }

        for (drive, state) in agent.drives.iter() {
            map.drives.insert(drive.as_str().to_string(), curve(state.level));
        }

        for arc in &agent.arcs {
            let entry = map.arcs.entry(arc.topic.clone()).or_insert(0.0);
            *entry = entry.max(curve(arc.intensity));
        }

        tracing::debug!("salience[{}]: max {:.3}", agent.id, map.max());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_core::{Drive, EmotionalArc, Horizon, Intention, IntentionKind, RelationshipEdge};

    fn agent() -> Agent {
        let mut agent = Agent::new("mara", "Mara");
        let mut edge = RelationshipEdge::new(CounterpartRef::agent("bram"));
        edge.trust = -0.5;
        edge.tension = 0.2;
        agent.relationships.push(edge);
        agent
    }

    #[test]
    fn test_person_tiers_and_boost() {
        let engine = SalienceEngine::default();
        let perception = PerceptionContext::default()
            .with_person(CounterpartRef::agent("bram"), Proximity::Nearby)
            .with_person(CounterpartRef::agent("cora"), Proximity::Background);
        let map = engine.score(&agent(), &perception);
        // 0.7 + 0.3 * 0.5
        assert!((map.people["agent:bram"] - 0.85).abs() < 1e-6);
        assert!((map.people["agent:cora"] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_person_clamped() {
        let engine = SalienceEngine::default();
        let perception = PerceptionContext::default()
            .with_person(CounterpartRef::agent("bram"), Proximity::PhysicallyPresent);
        let map = engine.score(&agent(), &perception);
        assert_eq!(map.people["agent:bram"], 1.0);
    }

    #[test]
    fn test_topic_arc_and_intentions() {
        let engine = SalienceEngine::default();
        let mut a = agent();
        a.arcs.push(EmotionalArc::new("flood", &["river", "flood"], 1.0));
        a.intentions.push(Intention::new(IntentionKind::Protect, "guard the river bank", 0.6, Horizon::Short));

        let perception = PerceptionContext::default().with_topic("river").with_topic("weather");
        let map = engine.score(&a, &perception);
        // 0.5 + 0.3 * 1.0 + 0.2, clamped
        assert_eq!(map.topics["river"], 1.0);
        assert!((map.topics["weather"] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_inactive_arc_ignored_for_topics() {
        let engine = SalienceEngine::default();
        let mut a = agent();
        a.arcs.push(EmotionalArc::new("flood", &["flood"], 0.01));
        let map = engine.score(&a, &PerceptionContext::default().with_topic("flood"));
        assert!((map.topics["flood"] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_drive_curve_suppresses_low_values() {
        let engine = SalienceEngine::default();
        let mut a = agent();
        a.drives.set_level(Drive::Safety, 0.25);
        a.drives.set_level(Drive::Novelty, 1.0);
        let map = engine.score(&a, &PerceptionContext::default());
        assert!((map.drives["safety"] - 0.125).abs() < 1e-6);
        assert_eq!(map.drives["novelty"], 1.0);
        assert_eq!(map.max(), 1.0);
        assert_eq!(map.focus().map(|(c, id, _)| (c, id)), Some(("drive", "novelty")));
    }

    #[test]
    fn test_objects() {
        let engine = SalienceEngine::default();
        let perception = PerceptionContext::default()
            .with_object("lantern", Relevance::Critical)
            .with_object("bench", Relevance::Background);
        let map = engine.score(&Agent::new("x", "X"), &perception);
        assert!((map.objects["lantern"] - 0.9).abs() < 1e-6);
        assert!((map.objects["bench"] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_map_max_is_zero() {
        assert_eq!(SalienceMap::default().max(), 0.0);
        assert!(SalienceMap::default().focus().is_none());
    }
}
