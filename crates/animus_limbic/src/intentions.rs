//! The intention queue: reminder-driven obligations, start escalation,
//! completion by correlation key, and per-cycle decay.
//!
//! Obligations are matched by the event's correlation key. A reminder that
//! carries no key is tracked by its exact description instead.

use animus_core::{Event, EventKind, Horizon, Intention, IntentionKind, LawConfig};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntentionChanges {
    pub created: Vec<String>,
    pub escalated: Vec<String>,
    pub completed: Vec<String>,
    pub dropped: Vec<String>,
}

impl IntentionChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.escalated.is_empty()
            && self.completed.is_empty()
            && self.dropped.is_empty()
    }
}

fn matches(intention: &Intention, event: &Event) -> bool {
    if !intention.is_obligation() {
        return false;
    }
    match (event.correlation_key(), intention.correlation_key.as_deref()) {
        (Some(key), Some(own)) => key == own,
        (Some(_), None) => false,
        (None, _) => intention.correlation_key.is_none() && intention.description == event.description,
    }
}

/// Apply calendar events in order.
pub fn apply_events(intentions: &mut Vec<Intention>, events: &[Event], laws: &LawConfig) -> IntentionChanges {
    let mut changes = IntentionChanges::default();
    for event in events {
        match event.kind {
            EventKind::CalendarReminder => {
                if intentions.iter().any(|i| matches(i, event)) {
                    continue;
                }
                let mut obligation = Intention::new(
                    IntentionKind::Obligation,
                    event.description.clone(),
                    laws.reminder_priority,
                    Horizon::Short,
                );
                if let Some(key) = event.correlation_key() {
                    obligation = obligation.with_correlation_key(key);
                }
                tracing::debug!("intentions: new obligation '{}'", obligation.description);
                changes.created.push(obligation.description.clone());
                intentions.push(obligation);
            }
            EventKind::CalendarStart => {
                for intention in intentions.iter_mut().filter(|i| matches(i, event)) {
                    intention.priority = 1.0;
                    changes.escalated.push(intention.description.clone());
                }
            }
            EventKind::ActionCompleted => {
                // Only keyed completions resolve obligations.
                if event.correlation_key().is_none() {
                    continue;
                }
                intentions.retain(|i| {
                    let done = matches(i, event);
                    if done {
                        changes.completed.push(i.description.clone());
                    }
                    !done
                });
            }
            _ => {}
        }
    }
    changes
}

/// Non-obligation intentions lose priority every cycle. Anything at or below
/// the floor is dropped, obligations included. Returns the dropped descriptions.
pub fn decay(intentions: &mut Vec<Intention>, laws: &LawConfig) -> Vec<String> {
    for intention in intentions.iter_mut() {
        if !intention.is_obligation() {
            intention.priority = (intention.priority - laws.intention_decay).max(0.0);
        }
    }
    let mut dropped = Vec::new();
    intentions.retain(|i| {
        let keep = i.priority > laws.intention_drop_floor;
        if !keep {
            dropped.push(i.description.clone());
        }
        keep
    });
    dropped
}
