//! Semantic decoding: validated text items → numeric deltas via fixed tables.
//!
//! Tables are global and caller-independent: a key always yields the same
//! delta. Anything not in a table is a no-op; decode never guesses a mapping.

use crate::safety::{Operation, ValidIntentionUpdate, ValidatedResponse};
use animus_core::{Agent, Drive, Horizon, Intention, IntentionKind, RelationshipEdge};
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// Stance table
// ============================================================================

/// Signed deltas on relationship channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StanceDelta {
    pub warmth: f32,
    pub trust: f32,
    pub tension: f32,
    pub attraction: f32,
    pub comfort: f32,
}

/// Every key the stance table knows, in table order.
pub const STANCE_KEYS: [&str; 10] = [
    "warming",
    "cooling",
    "growing_trust",
    "losing_trust",
    "reconciling",
    "escalating",
    "drawn_closer",
    "pulling_away",
    "at_ease",
    "guarded",
];

/// Normalise a stance key: trimmed, lowercase, spaces and hyphens as `_`.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

pub fn stance_delta(key: &str) -> Option<StanceDelta> {
    let d = StanceDelta::default();
    let delta = match normalize_key(key).as_str() {
        "warming" => StanceDelta { warmth: 0.1, ..d },
        "cooling" => StanceDelta { warmth: -0.1, ..d },
        "growing_trust" => StanceDelta { trust: 0.1, ..d },
        "losing_trust" => StanceDelta { trust: -0.1, ..d },
        "reconciling" => StanceDelta { tension: -0.15, warmth: 0.05, ..d },
        "escalating" => StanceDelta { tension: 0.15, warmth: -0.05, ..d },
        "drawn_closer" => StanceDelta { attraction: 0.1, warmth: 0.05, ..d },
        "pulling_away" => StanceDelta { attraction: -0.1, comfort: -0.05, ..d },
        "at_ease" => StanceDelta { comfort: 0.1, tension: -0.05, ..d },
        "guarded" => StanceDelta { comfort: -0.1, trust: -0.05, ..d },
        _ => return None,
    };
    Some(delta)
}

/// Apply a stance key to one edge. Unknown keys leave the edge untouched and
/// return `false`.
pub fn apply_stance(edge: &mut RelationshipEdge, key: &str) -> bool {
    let Some(delta) = stance_delta(key) else {
        return false;
    };
    edge.warmth += delta.warmth;
    edge.trust += delta.trust;
    edge.tension += delta.tension;
    edge.attraction += delta.attraction;
    edge.comfort += delta.comfort;
    edge.normalize();
    true
}

// ============================================================================
// Intention table
// ============================================================================

/// Drive effect of pursuing an intention of this type.
pub fn intention_effect(kind: IntentionKind) -> &'static [(Drive, f32)] {
    match kind {
        IntentionKind::Avoid => &[(Drive::Safety, 0.1), (Drive::Autonomy, 0.05)],
        IntentionKind::Raise => &[(Drive::Competence, 0.1), (Drive::Novelty, 0.05)],
        IntentionKind::Support => &[(Drive::Relatedness, 0.1)],
        IntentionKind::Protect => &[(Drive::Safety, 0.1), (Drive::Relatedness, 0.05)],
        IntentionKind::Distance => &[(Drive::Autonomy, 0.1), (Drive::Relatedness, -0.05)],
        IntentionKind::Obligation => &[],
    }
}

pub fn horizon_multiplier(horizon: Horizon) -> f32 {
    match horizon {
        Horizon::Short => 1.0,
        Horizon::Medium => 0.7,
        Horizon::Long => 0.4,
    }
}

/// Lower and drop invert the sign: withdrawing a goal brings relief.
pub fn operation_multiplier(op: Operation) -> f32 {
    match op {
        Operation::Create => 1.0,
        Operation::Boost => 1.5,
        Operation::Lower => -0.5,
        Operation::Drop => -0.7,
    }
}

/// Drive deltas for one update, independent of the agent.
pub fn intention_drive_deltas(update: &ValidIntentionUpdate) -> Vec<(Drive, f32)> {
    let scale = horizon_multiplier(update.horizon) * operation_multiplier(update.operation);
    intention_effect(update.kind)
        .iter()
        .map(|(d, v)| (*d, v * scale))
        .collect()
}

const CREATED_PRIORITY: f32 = 0.5;
const PRIORITY_STEP: f32 = 0.2;

fn same_intention(i: &Intention, update: &ValidIntentionUpdate) -> bool {
    i.kind == update.kind && i.description.to_lowercase() == update.description.to_lowercase()
}

// ============================================================================
// Decoder
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeReport {
    pub stances_applied: Vec<String>,
    /// `counterpart: stance` pairs that resolved to nothing.
    pub stances_skipped: Vec<String>,
    pub intentions_applied: Vec<String>,
    /// Updates that matched nothing to change: a `create` of an intention
    /// already held, or a boost, lower or drop with no matching intention.
    pub intentions_skipped: Vec<String>,
    pub drive_deltas: BTreeMap<Drive, f32>,
}

pub struct SemanticDecoder;

impl SemanticDecoder {
    /// Apply a validated response to `agent`. Items that do not resolve are
    /// skipped individually; the rest still apply.
    pub fn apply(agent: &mut Agent, response: &ValidatedResponse) -> DecodeReport {
        let mut report = DecodeReport::default();

        for shift in &response.stance_shifts {
            let label = format!("{}: {}", shift.counterpart, shift.stance);
            let applied = match agent.edge_by_name_mut(&shift.counterpart) {
                Some(edge) => apply_stance(edge, &shift.stance),
                None => false,
            };
            if applied {
                report.stances_applied.push(label);
            } else {
                tracing::debug!("decode: skipped stance '{}'", label);
                report.stances_skipped.push(label);
            }
        }

        for update in &response.intention_updates {
            for (drive, delta) in intention_drive_deltas(update) {
                let level = agent.drives.level(drive) + delta;
                agent.drives.set_level(drive, level);
                *report.drive_deltas.entry(drive).or_insert(0.0) += delta;
            }

            let existing = agent.intentions.iter().position(|i| same_intention(i, update));
            let changed = match (update.operation, existing) {
                (Operation::Create, None) => {
                    agent.intentions.push(Intention::new(
                        update.kind,
                        update.description.clone(),
                        CREATED_PRIORITY,
                        update.horizon,
                    ));
                    true
                }
                (Operation::Create, Some(_)) => false,
                (Operation::Boost, Some(idx)) => {
                    let i = &mut agent.intentions[idx];
                    i.priority = (i.priority + PRIORITY_STEP).min(1.0);
                    true
                }
                (Operation::Lower, Some(idx)) => {
                    let i = &mut agent.intentions[idx];
                    i.priority = (i.priority - PRIORITY_STEP).max(0.0);
                    true
                }
                (Operation::Drop, Some(idx)) => {
                    agent.intentions.remove(idx);
                    true
                }
                (_, None) => false,
            };
            let label = format!(
                "{} {} '{}'",
                update.operation.as_str(),
                update.kind.as_str(),
                update.description
            );
            if changed {
                report.intentions_applied.push(label);
            } else {
                tracing::debug!("decode: intention update '{}' matched nothing", label);
                report.intentions_skipped.push(label);
            }
        }

        agent.normalize();
        report
    }
}
