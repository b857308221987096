//! Drives: event-driven need deltas plus homeostatic drift.

use animus_core::{drive_effect, Drive, DriveSet, Event, LawConfig};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed, sensitivity-scaled deltas applied in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriveDeltas(pub BTreeMap<Drive, f32>);

impl DriveDeltas {
    pub fn get(&self, drive: Drive) -> f32 {
        self.0.get(&drive).copied().unwrap_or(0.0)
    }

    /// Sum over all drives.
    pub fn total(&self) -> f32 {
        self.0.values().sum()
    }
}

/// Sum every event's effect (scaled by the agent's per-drive sensitivity)
/// and add it to the levels with a saturating clamp.
pub fn compute_deltas(drives: &DriveSet, events: &[Event]) -> DriveDeltas {
    let mut deltas = BTreeMap::new();
    for event in events {
        let effect = drive_effect(&event.kind);
        for (drive, raw) in &effect.drives {
            let scaled = raw * drives.get(*drive).sensitivity;
            *deltas.entry(*drive).or_insert(0.0) += scaled;
        }
    }
    DriveDeltas(deltas)
}

pub fn apply_events(drives: &mut DriveSet, events: &[Event]) -> DriveDeltas {
    let deltas = compute_deltas(drives, events);
    for (drive, delta) in &deltas.0 {
        let level = drives.level(*drive) + delta;
        drives.set_level(*drive, level);
    }
    if !deltas.0.is_empty() {
        tracing::debug!("drives: applied {:?}", deltas.0);
    }
    deltas
}

/// Move every drive a fixed fraction of the way back to baseline.
/// Never overshoots while `drive_drift` lies in `[0, 1]`.
pub fn homeostasis(drives: &mut DriveSet, laws: &LawConfig) {
    for drive in Drive::ALL {
        let level = drives.level(drive);
        let next = level + (laws.drive_baseline - level) * laws.drive_drift;
        drives.set_level(drive, next);
    }
}
