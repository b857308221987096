//! Semantic encoding: numeric state → canonical sentences.
//!
//! Only text produced by these bucketing functions describes numeric state
//! toward the generative capability; raw numbers never cross. Each channel has
//! a small fixed set of sentences, so identical input always renders to
//! byte-identical text.

use animus_core::{Agent, Drive, EmotionalArc, Intention, IntentionKind, Mood, Personality, RelationshipEdge};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Per-channel bucketing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Low,
    Mid,
    High,
}

fn tier(x: f32, low: f32, high: f32) -> Tier {
    if x < low {
        Tier::Low
    } else if x > high {
        Tier::High
    } else {
        Tier::Mid
    }
}

pub fn mood_sentence(mood: &Mood) -> String {
    let valence = tier(mood.valence, -0.3, 0.3);
    let arousal = tier(mood.arousal, 0.3, 0.7);
    let s = match (valence, arousal) {
        (Tier::High, Tier::High) => "They are elated and full of energy.",
        (Tier::High, Tier::Mid) => "They are in good spirits.",
        (Tier::High, Tier::Low) => "They feel content and at peace.",
        (Tier::Mid, Tier::High) => "They are keyed up and restless.",
        (Tier::Mid, Tier::Mid) => "Their mood is steady.",
        (Tier::Mid, Tier::Low) => "They feel calm and unhurried.",
        (Tier::Low, Tier::High) => "They are upset and agitated.",
        (Tier::Low, Tier::Mid) => "They are in a sour mood.",
        (Tier::Low, Tier::Low) => "They feel low and withdrawn.",
    };
    s.to_string()
}

pub fn drive_sentence(drive: Drive, level: f32) -> String {
    match tier(level, 0.35, 0.65) {
        Tier::Low => format!("Their sense of {} is running thin.", drive.noun()),
        Tier::Mid => format!("Their sense of {} is holding steady.", drive.noun()),
        Tier::High => format!("Their sense of {} runs strong.", drive.noun()),
    }
}

pub fn energy_sentence(energy: f32) -> String {
    match tier(energy, 0.3, 0.7) {
        Tier::Low => "They are exhausted.",
        Tier::Mid => "They are somewhat tired.",
        Tier::High => "They are well rested.",
    }
    .to_string()
}

/// Categorical description of an edge. Checks run from most to least
/// specific; combinations that fit no category get the mixed-feelings line.
pub fn relationship_sentence(edge: &RelationshipEdge) -> String {
    let name = edge.display_name();
    let (w, t, tn) = (edge.warmth, edge.trust, edge.tension);

    let core = if t < -0.3 && tn > 0.5 {
        format!("They distrust {} and feel openly at odds with them.", name)
    } else if w > 0.5 && t > 0.5 {
        if edge.attraction > 0.6 {
            format!("{} is dear to them, trusted, and they feel drawn to them.", name)
        } else if tn > 0.4 {
            format!("{} is a trusted friend, though things are tense between them lately.", name)
        } else {
            format!("{} is a close and trusted friend.", name)
        }
    } else if w > 0.3 && tn > 0.5 {
        format!("They care about {} but keep clashing with them.", name)
    } else if w > 0.3 {
        if t < -0.3 {
            format!("They like {} but do not trust them.", name)
        } else {
            format!("They are fond of {}.", name)
        }
    } else if w < -0.3 {
        if tn > 0.5 {
            format!("They resent {}.", name)
        } else {
            format!("They dislike {}.", name)
        }
    } else if tn > 0.6 {
        format!("Things are strained between them and {}.", name)
    } else if t > 0.5 {
        format!("They rely on {} without being especially close.", name)
    } else if t < -0.3 {
        format!("They are wary of {}.", name)
    } else if w.abs() < 0.2 && t.abs() < 0.2 && tn < 0.2 {
        if edge.familiarity > 0.5 {
            format!("{} is a familiar face they feel neutral about.", name)
        } else {
            format!("They barely know {}.", name)
        }
    } else {
        format!("They have mixed feelings about {}.", name)
    };

    if edge.comfort > 0.6 {
        format!("{} They feel at ease around them.", core)
    } else {
        core
    }
}

pub fn arc_sentence(arc: &EmotionalArc) -> String {
    let colour = match tier(arc.valence_bias, -0.3, 0.3) {
        Tier::Low => " with dread",
        Tier::Mid => "",
        Tier::High => " with hope",
    };
    match tier(arc.intensity, 0.2, 0.6) {
        Tier::Low => format!("The matter of {} lingers faintly{}.", arc.topic, colour),
        Tier::Mid => format!("The matter of {} weighs on them{}.", arc.topic, colour),
        Tier::High => format!("They are consumed by the matter of {}{}.", arc.topic, colour),
    }
}

pub fn intention_sentence(intention: &Intention) -> String {
    let lead = match tier(intention.priority, 0.4, 0.75) {
        Tier::Low => "In the back of their mind, they",
        Tier::Mid => "They",
        Tier::High => "Above all, they",
    };
    let d = &intention.description;
    match intention.kind {
        IntentionKind::Obligation => format!("{} have to {}.", lead, d),
        IntentionKind::Avoid => format!("{} want to avoid {}.", lead, d),
        IntentionKind::Raise => format!("{} want to bring up {}.", lead, d),
        IntentionKind::Support => format!("{} want to support {}.", lead, d),
        IntentionKind::Protect => format!("{} want to protect {}.", lead, d),
        IntentionKind::Distance => format!("{} want to keep their distance from {}.", lead, d),
    }
}

/// Stable temperament summary from the strongest traits.
pub fn personality_summary(personality: &Personality) -> String {
    let words: Vec<String> = personality
        .ranked()
        .into_iter()
        .filter(|(_, s)| *s >= 0.3)
        .take(3)
        .map(|(name, s)| {
            if s >= 0.6 {
                format!("strongly {}", name)
            } else {
                format!("somewhat {}", name)
            }
        })
        .collect();
    if words.is_empty() {
        "Their temperament is even and unremarkable.".to_string()
    } else {
        format!("By nature they are {}.", words.join(", "))
    }
}

/// Short per-cycle sentence on how the current state colours the temperament.
/// First matching condition wins.
pub fn activation_sentence(agent: &Agent) -> String {
    if agent.energy < 0.3 {
        return "Right now fatigue dulls their usual temperament.".to_string();
    }
    let hottest = agent
        .arcs
        .iter()
        .filter(|a| a.intensity >= 0.6)
        .fold(None::<&EmotionalArc>, |best, a| match best {
            Some(b) if b.intensity >= a.intensity => Some(b),
            _ => Some(a),
        });
    if let Some(arc) = hottest {
        return format!("Right now the matter of {} colours everything they do.", arc.topic);
    }
    if agent.mood.intensity() > 0.6 {
        return "Right now their mood pushes their nature to the surface.".to_string();
    }
    let (drive, level) = agent.drives.max_level();
    if level > 0.75 {
        return format!("Right now their need for {} shapes how they act.", drive.noun());
    }
    "Right now they are much like their usual self.".to_string()
}

// ============================================================================
// Encoded context
// ============================================================================

/// Everything sent toward the generative capability, already in words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedContext {
    pub name: String,
    pub personality: String,
    pub activation: String,
    pub mood: String,
    pub energy: String,
    pub drives: Vec<String>,
    pub relationships: Vec<String>,
    pub arcs: Vec<String>,
    pub intentions: Vec<String>,
    /// Descriptions of the events in this cycle.
    pub happenings: Vec<String>,
    /// Recalled prior memories, most relevant first.
    pub memories: Vec<String>,
}

impl EncodedContext {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {} ==\n", self.name));
        out.push_str(&self.personality);
        out.push('\n');
        out.push_str(&self.activation);
        out.push('\n');

        out.push_str("\n== HOW THEY FEEL ==\n");
        out.push_str(&self.mood);
        out.push('\n');
        out.push_str(&self.energy);
        out.push('\n');
        for line in &self.drives {
            out.push_str(line);
            out.push('\n');
        }

        let sections = [
            ("PEOPLE", &self.relationships),
            ("ON THEIR MIND", &self.arcs),
            ("INTENTIONS", &self.intentions),
            ("WHAT JUST HAPPENED", &self.happenings),
            ("REMEMBERED", &self.memories),
        ];
        for (title, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("\n== {} ==\n", title));
            for line in lines {
                out.push_str("- ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Stable identifier of the rendered text; keys the response cache.
    pub fn context_hash(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.render().as_bytes())
    }
}

pub struct SemanticEncoder;

impl SemanticEncoder {
    pub fn encode(agent: &Agent, happenings: &[String], memories: &[String]) -> EncodedContext {
        let drives = Drive::ALL
            .iter()
            .map(|d| drive_sentence(*d, agent.drives.level(*d)))
            .collect();

        let relationships = agent.relationships.iter().map(relationship_sentence).collect();

        let arcs = agent
            .arcs
            .iter()
            .filter(|a| a.intensity >= 0.05)
            .map(arc_sentence)
            .collect();

        let mut intentions: Vec<&Intention> = agent.intentions.iter().collect();
        intentions.sort_by(|a, b| b.priority.partial_cmp(&a.priority).unwrap_or(std::cmp::Ordering::Equal));
        let intentions = intentions.into_iter().map(intention_sentence).collect();

        EncodedContext {
            name: agent.name.clone(),
            personality: personality_summary(&agent.personality),
            activation: activation_sentence(agent),
            mood: mood_sentence(&agent.mood),
            energy: energy_sentence(agent.energy),
            drives,
            relationships,
            arcs,
            intentions,
            happenings: happenings.to_vec(),
            memories: memories.to_vec(),
        }
    }
}
