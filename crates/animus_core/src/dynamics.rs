//! Event → drive-effect table.
//!
//! A single global, total mapping. Several per-cycle steps (drives, mood,
//! memory salience) recompute it from the event rather than sharing a cached
//! result, so each subsystem stays self-contained.

use crate::event::EventKind;
use crate::state::Drive;
use serde::Serialize;

/// Signed effect of one event, before per-agent sensitivity is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriveEffect {
    /// Signed deltas per drive
    pub drives: Vec<(Drive, f32)>,
    /// Mood-only arousal contribution (not a drive)
    pub arousal: f32,
}

impl DriveEffect {
    fn of(drives: &[(Drive, f32)], arousal: f32) -> Self {
        Self {
            drives: drives.to_vec(),
            arousal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty() && self.arousal == 0.0
    }

    /// Raw delta for `drive` (0.0 if the event does not touch it).
    pub fn get(&self, drive: Drive) -> f32 {
        self.drives
            .iter()
            .filter(|(d, _)| *d == drive)
            .map(|(_, v)| *v)
            .sum()
    }

    /// Drives this event moves at all.
    pub fn affected(&self) -> impl Iterator<Item = Drive> + '_ {
        self.drives.iter().filter(|(_, v)| *v != 0.0).map(|(d, _)| *d)
    }
}

/// The global table. Unknown kinds contribute nothing.
pub fn drive_effect(kind: &EventKind) -> DriveEffect {
    use Drive::*;
    match kind {
        EventKind::Interaction => DriveEffect::of(&[(Relatedness, 0.1)], 0.0),
        EventKind::Conflict => DriveEffect::of(&[(Relatedness, -0.2), (Safety, -0.1)], 0.3),
        EventKind::Betrayal => DriveEffect::of(&[(Relatedness, -0.25), (Safety, -0.15)], 0.2),
        EventKind::Achievement => DriveEffect::of(&[(Competence, 0.2), (Autonomy, 0.1)], 0.0),
        EventKind::Failure => DriveEffect::of(&[(Competence, -0.15)], 0.0),
        EventKind::IncursionSensory => DriveEffect::of(&[(Safety, -0.05), (Novelty, 0.1)], 0.1),
        EventKind::IncursionTemporal => DriveEffect::of(&[(Safety, -0.05), (Novelty, 0.05)], 0.05),
        EventKind::CalendarMissed => DriveEffect::of(&[(Competence, -0.1), (Safety, -0.05)], 0.0),
        EventKind::Work => DriveEffect::of(&[(Competence, 0.05)], 0.0),
        EventKind::Disclosure => DriveEffect::of(&[(Relatedness, 0.05)], 0.0),
        EventKind::CalendarReminder
        | EventKind::CalendarStart
        | EventKind::ActionCompleted
        | EventKind::Unknown(_) => DriveEffect::default(),
    }
}
