//! Energy: baseline depletion per cycle plus the cost of conflict and work.

use animus_core::{Event, EventKind, LawConfig};

/// Baseline depletion plus per-event costs, floored at zero.
/// Energy is never restored here; rest and sleep are outside the core.
pub fn update(energy: f32, events: &[Event], laws: &LawConfig) -> f32 {
    let cost: f32 = events
        .iter()
        .map(|e| match e.kind {
            EventKind::Conflict => laws.conflict_energy_cost,
            EventKind::Work => laws.work_energy_cost,
            _ => 0.0,
        })
        .sum();
    (energy - laws.energy_depletion - cost).clamp(0.0, 1.0)
}
