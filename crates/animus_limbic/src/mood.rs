//! Mood: valence follows summed drive deltas, arousal follows explicit
//! event arousal and positive novelty; both decay toward the origin.

use animus_core::{drive_effect, Drive, DriveSet, Event, LawConfig, Mood};

/// Update `mood` from this cycle's events.
///
/// The drive effects are recomputed from the events (scaled by the same
/// sensitivities the drive step used) rather than passed in.
pub fn update(mood: &mut Mood, drives: &DriveSet, events: &[Event], laws: &LawConfig) {
    let mut drive_sum = 0.0;
    let mut arousal_in = 0.0;
    for event in events {
        let effect = drive_effect(&event.kind);
        for (drive, raw) in &effect.drives {
            let scaled = raw * drives.get(*drive).sensitivity;
            drive_sum += scaled;
            if *drive == Drive::Novelty && scaled > 0.0 {
                arousal_in += laws.novelty_arousal_coupling * scaled;
            }
        }
        arousal_in += effect.arousal;
    }

    mood.valence += laws.mood_valence_coupling * drive_sum;
    mood.arousal += arousal_in;
    mood.normalize();

    decay(mood, laws);
}

/// Shrink both axes by `mood_decay`. Monotone toward `(0, 0)`, no overshoot.
pub fn decay(mood: &mut Mood, laws: &LawConfig) {
    let keep = 1.0 - laws.mood_decay;
    mood.valence *= keep;
    mood.arousal *= keep;
    mood.normalize();
}
