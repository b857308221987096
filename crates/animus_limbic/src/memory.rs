//! Memory recording: salience-gated episodic memories and unconditional
//! biographical memories for disclosures. Append-only.

use animus_core::{drive_effect, Agent, Event, EventKind, Memory, MemoryConfig, MemoryKind};
use uuid::Uuid;

fn base_salience(kind: &EventKind) -> f32 {
    match kind {
        EventKind::Conflict | EventKind::Achievement | EventKind::IncursionSensory => 0.4,
        EventKind::Interaction => 0.3,
        _ => 0.1,
    }
}

/// Score how memorable `event` is for `agent` right now.
///
/// Drive deviation is read from the agent's current levels, so within a cycle
/// this must run after the event deltas and before homeostasis.
pub fn salience(event: &Event, agent: &Agent, config: &MemoryConfig, baseline: f32) -> f32 {
    let mut score = base_salience(&event.kind);

    if let Some(who) = &agent.distinguished_counterpart {
        if event.involves(who) {
            score += config.distinguished_bonus;
        }
    }

    let deviated = drive_effect(&event.kind)
        .affected()
        .any(|d| (agent.drives.level(d) - baseline).abs() > config.deviation_limit);
    if deviated {
        score += config.deviation_bonus;
    }

    if event.kind.is_incursion() {
        score += config.incursion_bonus;
    }

    score.clamp(0.0, 1.0)
}

fn tags_for(event: &Event) -> Vec<String> {
    let mut tags = vec![event.kind.as_str().to_string()];
    if event.kind.is_incursion() {
        tags.push("incursion".to_string());
    }
    for who in [&event.source, &event.target] {
        if !who.is_system() {
            let tag = who.to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

/// Ids are derived from the agent, its memory count and the event so that
/// replaying the same cycle yields the same memories.
fn memory_id(agent: &Agent, event: &Event) -> Uuid {
    let seed = format!(
        "{}:{}:{}:{}:{}",
        agent.id,
        agent.memories.len(),
        event.kind.as_str(),
        event.timestamp.timestamp_millis(),
        event.description
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
}

/// Append memories for this cycle's events. Returns the ids created.
pub fn record(agent: &mut Agent, events: &[Event], config: &MemoryConfig, baseline: f32) -> Vec<Uuid> {
    let mut created = Vec::new();
    for event in events {
        let (kind, score) = if event.kind == EventKind::Disclosure {
            (MemoryKind::Biographical, config.disclosure_salience.clamp(0.0, 1.0))
        } else {
            let score = salience(event, agent, config, baseline);
            if score < config.episodic_threshold {
                continue;
            }
            (MemoryKind::Episodic, score)
        };

        let memory = Memory {
            id: memory_id(agent, event),
            kind,
            description: event.description.clone(),
            salience: score,
            tags: tags_for(event),
            timestamp: event.timestamp,
        };
        tracing::debug!(
            "memory: {:?} '{}' (salience {:.2})",
            memory.kind,
            memory.description,
            memory.salience
        );
        created.push(memory.id);
        agent.memories.push(memory);
    }
    created
}
