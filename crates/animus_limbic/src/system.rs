//! The per-cycle update pipeline.
//!
//! Order is fixed: drives, mood, arcs, relationships (events then drift),
//! intentions (events then decay), energy, memories, and finally drive
//! homeostasis. Memory scoring therefore sees the post-event drive levels.

use crate::drives::{self, DriveDeltas};
use crate::intentions::{self, IntentionChanges};
use crate::{arcs, energy, memory, mood, relationships};
use animus_core::{Agent, AnimusConfig, Event, Mood};
use serde::Serialize;
use uuid::Uuid;

/// What one cycle did to an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleOutcome {
    pub drive_deltas: DriveDeltas,
    pub mood_before: Mood,
    pub mood_after: Mood,
    pub arcs_reinforced: usize,
    pub edges_touched: usize,
    pub intentions: IntentionChanges,
    pub energy_before: f32,
    pub energy_after: f32,
    pub memories_created: Vec<Uuid>,
}

/// Runs the update laws. Holds only immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct LimbicSystem {
    config: AnimusConfig,
}

impl LimbicSystem {
    pub fn new(config: AnimusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimusConfig {
        &self.config
    }

    /// Apply one cycle's events to `agent`. Deterministic in `(agent, events)`.
    /// Every bounded field is clamped on exit.
    pub fn process(&self, agent: &mut Agent, events: &[Event]) -> CycleOutcome {
        let laws = &self.config.laws;
        agent.normalize();

        let mood_before = agent.mood;
        let energy_before = agent.energy;

        let drive_deltas = drives::apply_events(&mut agent.drives, events);
        mood::update(&mut agent.mood, &agent.drives, events, laws);
        let arcs_reinforced = arcs::update(&mut agent.arcs, events, laws);

        let self_ref = agent.self_ref();
        let edges_touched = relationships::apply_events(&mut agent.relationships, &self_ref, events);
        relationships::drift(&mut agent.relationships, laws);

        let mut intention_changes = intentions::apply_events(&mut agent.intentions, events, laws);
        intention_changes.dropped = intentions::decay(&mut agent.intentions, laws);

        agent.energy = energy::update(agent.energy, events, laws);

        let memories_created = memory::record(agent, events, &self.config.memory, laws.drive_baseline);

        drives::homeostasis(&mut agent.drives, laws);
        agent.normalize();

        tracing::debug!(
            "limbic[{}]: {} event(s), {} edge update(s), {} memory(ies), energy {:.3}, mood {}",
            agent.id,
            events.len(),
            edges_touched,
            memories_created.len(),
            agent.energy,
            agent.mood.label()
        );

        CycleOutcome {
            drive_deltas,
            mood_before,
            mood_after: agent.mood,
            arcs_reinforced,
            edges_touched,
            intentions: intention_changes,
            energy_before,
            energy_after: agent.energy,
            memories_created,
        }
    }
}
