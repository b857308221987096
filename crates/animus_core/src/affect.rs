//! Two-axis affect (Russell's circumplex, simplified).
//!
//! Mood is kept distinct from drives: drives are persistent needs, mood is the
//! short-lived emotional tone those needs and events produce.

use crate::state::sanitize_f32;
use serde::{Deserialize, Serialize};

/// Valence × arousal. Rests at the origin `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mood {
    /// Valence: negative/positive (-1.0 to 1.0)
    pub valence: f32,
    /// Arousal: calm/activated (0.0 to 1.0)
    pub arousal: f32,
}

impl Mood {
    pub fn new(valence: f32, arousal: f32) -> Self {
        let mut mood = Self { valence, arousal };
        mood.normalize();
        mood
    }

    /// Sanitize and clamp both axes.
    pub fn normalize(&mut self) {
        self.valence = sanitize_f32(self.valence, 0.0).clamp(-1.0, 1.0);
        self.arousal = sanitize_f32(self.arousal, 0.0).clamp(0.0, 1.0);
    }

    /// Distance from the resting point.
    pub fn intensity(&self) -> f32 {
        (self.valence.powi(2) + self.arousal.powi(2)).sqrt()
    }

    /// Closest coarse label, for logs.
    pub fn label(&self) -> &'static str {
        if self.intensity() < 0.15 {
            return "neutral";
        }
        match (self.valence >= 0.0, self.arousal >= 0.5) {
            (true, true) => "excited",
            (true, false) => "content",
            (false, true) => "agitated",
            (false, false) => "low",
        }
    }
}
