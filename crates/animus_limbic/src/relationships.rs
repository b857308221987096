//! Relationships: per-counterpart event deltas and passive drift.
//!
//! Edges toward external users are the agent's own stance and are updated like
//! any other edge; the ledger never reads or writes any state on the
//! counterpart's side.

use animus_core::{CounterpartRef, Event, EventKind, LawConfig, RelationshipEdge};

/// Apply one event's fixed deltas, amplified by `(1 + volatility)`.
/// Familiarity gain is not amplified.
pub fn apply_event(edge: &mut RelationshipEdge, kind: &EventKind) {
    let s = 1.0 + edge.volatility;
    match kind {
        EventKind::Interaction => {
            edge.warmth += 0.05 * s;
            edge.familiarity += 0.02;
            edge.tension -= 0.05 * s;
        }
        EventKind::Conflict => {
            edge.tension += 0.1 * s;
            edge.warmth -= 0.1 * s;
            edge.trust -= 0.05 * s;
        }
        EventKind::Betrayal => {
            edge.trust -= 0.3 * s;
            edge.tension += 0.2 * s;
        }
        _ => return,
    }
    edge.normalize();
}

/// Apply every event to the edges of the counterparts it involves.
/// Returns how many edge updates happened.
pub fn apply_events(
    edges: &mut [RelationshipEdge],
    self_ref: &CounterpartRef,
    events: &[Event],
) -> usize {
    let mut touched = 0;
    for event in events {
        let mut counterparts = vec![&event.source];
        if event.target != event.source {
            counterparts.push(&event.target);
        }
        for who in counterparts {
            if who == self_ref || who.is_system() {
                continue;
            }
            if let Some(edge) = edges.iter_mut().find(|e| &e.target == who) {
                let before = edge.clone();
                apply_event(edge, &event.kind);
                if *edge != before {
                    touched += 1;
                }
            }
        }
    }
    touched
}

/// Passive per-cycle drift, independent of events. Tension heals fastest,
/// familiarity is the most durable.
pub fn drift(edges: &mut [RelationshipEdge], laws: &LawConfig) {
    for edge in edges.iter_mut() {
        edge.warmth *= laws.warmth_drift;
        edge.tension *= laws.tension_drift;
        edge.familiarity *= laws.familiarity_drift;
        edge.normalize();
    }
}
