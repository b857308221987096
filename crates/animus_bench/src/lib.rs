//! animus_bench: trajectory simulation tests for the update laws.
//!
//! Validates behaviour over long runs of cycles:
//! - long silence (homeostatic recovery)
//! - repeated conflict (relationship scarring that outlasts drive recovery)
//! - saturation (clamps hold under extreme event streams)

use animus_core::{Agent, Event};
use animus_limbic::LimbicSystem;
use chrono::{DateTime, Duration, Utc};

/// Run `cycles` cycles, building each cycle's events with `events_at`.
/// `after_cycle` sees the agent after every cycle.
pub fn simulate<E, F>(
    system: &LimbicSystem,
    agent: &mut Agent,
    start: DateTime<Utc>,
    cycles: usize,
    mut events_at: E,
    mut after_cycle: F,
) where
    E: FnMut(usize, DateTime<Utc>) -> Vec<Event>,
    F: FnMut(usize, &Agent),
{
    for i in 0..cycles {
        let now = start + Duration::minutes(i as i64);
        let events = events_at(i, now);
        system.process(agent, &events);
        after_cycle(i, agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_core::{
        AnimusConfig, CounterpartRef, Drive, EmotionalArc, EventKind, Horizon, Intention, IntentionKind, Mood,
        RelationshipEdge,
    };
    use animus_expression::{MeaningfulnessScorer, PerceptionContext, SalienceEngine};

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn mara() -> Agent {
        let mut agent = Agent::new("mara", "Mara");
        let mut edge = RelationshipEdge::new(CounterpartRef::agent("bram")).named("Bram");
        edge.warmth = 0.5;
        edge.trust = 0.5;
        edge.tension = 0.3;
        agent.relationships.push(edge);
        agent.distinguished_counterpart = Some(CounterpartRef::agent("bram"));
        agent
    }

    fn conflict(now: DateTime<Utc>) -> Event {
        Event::new(EventKind::Conflict, "Bram shouted at her in the square", now)
            .with_source(CounterpartRef::agent("bram"))
            .with_target(CounterpartRef::agent("mara"))
    }

    /// 1000 silent cycles from a disturbed state: drives and mood return to
    /// rest monotonically without overshooting.
    #[test]
    fn test_long_silence_recovers_baseline() {
        let system = LimbicSystem::default();
        let mut agent = mara();
        agent.drives.set_level(Drive::Relatedness, 0.05);
        agent.drives.set_level(Drive::Safety, 0.95);
        agent.drives.set_level(Drive::Novelty, 0.2);
        agent.mood = Mood::new(-0.8, 0.9);
        agent.arcs.push(EmotionalArc::new("the flood", &["flood"], 0.9));
        agent
            .intentions
            .push(Intention::new(IntentionKind::Protect, "the granary", 0.6, Horizon::Long));

        let mut prev = agent.clone();
        simulate(&system, &mut agent, start(), 1000, |_, _| Vec::new(), |i, a| {
            for d in Drive::ALL {
                let before = prev.drives.level(d) - 0.5;
                let after = a.drives.level(d) - 0.5;
                assert!(after.abs() <= before.abs() + 1e-6, "drive {:?} moved away at cycle {}", d, i);
                assert!(before * after >= 0.0, "drive {:?} overshot at cycle {}", d, i);
            }
            assert!(a.mood.valence.abs() <= prev.mood.valence.abs());
            assert!(a.mood.arousal <= prev.mood.arousal);
            prev = a.clone();
        });

        for d in Drive::ALL {
            assert!(
                (agent.drives.level(d) - 0.5).abs() < 0.005,
                "{:?} should settle near baseline, got {}",
                d,
                agent.drives.level(d)
            );
        }
        assert!(agent.mood.intensity() < 1e-3);
        assert!(agent.arcs[0].intensity < 0.9);
        assert!(agent.intentions.is_empty(), "un-pursued intentions should fade out");
        assert_eq!(agent.energy, 0.0);
        assert!(agent.memories.is_empty());
    }

    /// Fifty conflicts, then five hundred quiet cycles. Drives recover, but
    /// lost trust does not drift back and the memories stay.
    #[test]
    fn test_repeated_conflict_leaves_a_scar() {
        let system = LimbicSystem::default();
        let mut agent = mara();

        simulate(&system, &mut agent, start(), 50, |_, now| vec![conflict(now)], |_, _| {});

        let edge = &agent.relationships[0];
        assert_eq!(edge.trust, -1.0);
        assert!(edge.tension > 0.9, "tension should saturate, got {}", edge.tension);
        assert!(edge.warmth < 0.0);
        assert!(agent.drives.level(Drive::Relatedness) < 0.2);
        let scarred_memories = agent.memories.len();
        assert_eq!(scarred_memories, 50);

        let later = start() + Duration::minutes(50);
        simulate(&system, &mut agent, later, 500, |_, _| Vec::new(), |_, _| {});

        let edge = &agent.relationships[0];
        assert_eq!(edge.trust, -1.0, "trust has no passive drift");
        assert!(edge.tension < 0.01);
        assert!(edge.warmth.abs() < 0.1);
        assert!((agent.drives.level(Drive::Relatedness) - 0.5).abs() < 0.01);
        assert_eq!(agent.memories.len(), scarred_memories);
    }

    /// Extreme mixed streams on a maximally volatile edge never leave range.
    #[test]
    fn test_saturation_keeps_clamps() {
        let system = LimbicSystem::default();
        let mut agent = mara();
        agent.relationships[0].volatility = 1.0;

        let kinds = [
            EventKind::Betrayal,
            EventKind::Achievement,
            EventKind::Conflict,
            EventKind::Interaction,
            EventKind::IncursionSensory,
            EventKind::Work,
        ];
        simulate(
            &system,
            &mut agent,
            start(),
            300,
            |i, now| {
                let kind = kinds[i % kinds.len()].clone();
                (0..6)
                    .map(|_| {
                        Event::new(kind.clone(), "the mill burned", now)
                            .with_source(CounterpartRef::agent("bram"))
                            .with_target(CounterpartRef::agent("mara"))
                    })
                    .collect()
            },
            |i, a| {
                for d in Drive::ALL {
                    let level = a.drives.level(d);
                    assert!((0.0..=1.0).contains(&level), "{:?}={} at cycle {}", d, level, i);
                }
                assert!((-1.0..=1.0).contains(&a.mood.valence));
                assert!((0.0..=1.0).contains(&a.mood.arousal));
                assert!((0.0..=1.0).contains(&a.energy));
                let e = &a.relationships[0];
                assert!((-1.0..=1.0).contains(&e.warmth));
                assert!((-1.0..=1.0).contains(&e.trust));
                for v in [e.tension, e.attraction, e.familiarity, e.comfort] {
                    assert!((0.0..=1.0).contains(&v), "edge channel {} at cycle {}", v, i);
                }
                assert!(a.memories.iter().all(|m| (0.0..=1.0).contains(&m.salience)));
            },
        );
    }

    /// After a long quiet spell with nobody around, nothing is meaningful
    /// enough to consult the generative capability.
    #[test]
    fn test_exhausted_idle_agent_is_not_meaningful() {
        let config = AnimusConfig::default();
        let system = LimbicSystem::new(config.clone());
        let mut agent = mara();
        simulate(&system, &mut agent, start(), 400, |_, _| Vec::new(), |_, _| {});

        let salience = SalienceEngine::new(config.salience.clone()).score(&agent, &PerceptionContext::default());
        let scorer = MeaningfulnessScorer::new(config.meaning.clone());
        let m = scorer.score(&agent, &salience);
        assert!(m.score < scorer.threshold(), "M={}", m.score);
        assert!((m.fatigue_penalty - config.meaning.fatigue_weight).abs() < 1e-6);
    }
}
