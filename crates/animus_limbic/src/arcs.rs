//! Emotional arcs: slow decay plus keyword-triggered reinforcement.

use animus_core::{EmotionalArc, Event, LawConfig};

/// Decay every arc, then reinforce once per matching event.
/// Returns the number of reinforcements applied.
pub fn update(arcs: &mut [EmotionalArc], events: &[Event], laws: &LawConfig) -> usize {
    let mut reinforced = 0;
    for arc in arcs.iter_mut() {
        arc.intensity *= 1.0 - arc.decay_rate * laws.arc_decay_scale;
        arc.normalize();

        for event in events {
            if arc.matches_text(&event.description) {
                arc.intensity = (arc.intensity + laws.arc_reinforcement).min(1.0);
                reinforced += 1;
            }
        }
    }
    if reinforced > 0 {
        tracing::debug!("arcs: {} reinforcement(s)", reinforced);
    }
    reinforced
}
