//! Property-based tests for animus_limbic.
//!
//! The update laws must keep every bounded field in range for any event
//! sequence, be a pure function of (state, events), and relax toward baseline
//! when nothing happens.

use animus_core::{
    Agent, AnimusConfig, CounterpartRef, Drive, EmotionalArc, Event, EventKind, Horizon, Intention,
    IntentionKind, LawConfig, RelationshipEdge,
};
use animus_limbic::{drives, relationships, LimbicSystem};
use chrono::DateTime;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_kind() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::Interaction),
        Just(EventKind::Conflict),
        Just(EventKind::Betrayal),
        Just(EventKind::Achievement),
        Just(EventKind::Failure),
        Just(EventKind::IncursionSensory),
        Just(EventKind::IncursionTemporal),
        Just(EventKind::CalendarMissed),
        Just(EventKind::CalendarReminder),
        Just(EventKind::CalendarStart),
        Just(EventKind::ActionCompleted),
        Just(EventKind::Work),
        Just(EventKind::Disclosure),
        "[a-z]{3,8}".prop_map(|s| EventKind::Unknown(s)),
    ]
}

fn arb_counterpart() -> impl Strategy<Value = CounterpartRef> {
    prop_oneof![
        Just(CounterpartRef::System),
        Just(CounterpartRef::agent("mara")),
        Just(CounterpartRef::agent("bram")),
        Just(CounterpartRef::user("player")),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        arb_kind(),
        prop_oneof![Just("the flood"), Just("market day"), Just("a quiet evening")],
        arb_counterpart(),
        arb_counterpart(),
        proptest::option::of(prop_oneof![Just("nets"), Just("goats")]),
    )
        .prop_map(|(kind, desc, source, target, key)| {
            let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
            let mut e = Event::new(kind, desc, ts).with_source(source).with_target(target);
            if let Some(k) = key {
                e = e.with_correlation_key(k);
            }
            e
        })
}

fn arb_agent() -> impl Strategy<Value = Agent> {
    (
        proptest::collection::vec(0.0f32..=1.0, 5),
        proptest::collection::vec(0.0f32..=3.0, 5),
        -1.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
        (-1.0f32..=1.0, -1.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0),
        0.0f32..=1.0,
    )
        .prop_map(|(levels, sens, valence, arousal, energy, (w, t, tn, vol), arc)| {
            let mut agent = Agent::new("ana", "Ana");
            for (i, drive) in Drive::ALL.iter().enumerate() {
                agent.drives.set_level(*drive, levels[i]);
                agent.drives.set_sensitivity(*drive, sens[i]);
            }
            agent.mood.valence = valence;
            agent.mood.arousal = arousal;
            agent.energy = energy;
            agent.distinguished_counterpart = Some(CounterpartRef::user("player"));
            for target in [CounterpartRef::agent("mara"), CounterpartRef::user("player")] {
                let mut edge = RelationshipEdge::new(target);
                edge.warmth = w;
                edge.trust = t;
                edge.tension = tn;
                edge.volatility = vol;
                agent.relationships.push(edge);
            }
            agent.arcs.push(EmotionalArc::new("flood", &["flood"], arc));
            agent
                .intentions
                .push(Intention::new(IntentionKind::Support, "help bram", 0.6, Horizon::Medium));
            agent
        })
}

fn assert_bounded(agent: &Agent) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=1.0).contains(&agent.energy));
    prop_assert!((-1.0..=1.0).contains(&agent.mood.valence));
    prop_assert!((0.0..=1.0).contains(&agent.mood.arousal));
    for (_, s) in agent.drives.iter() {
        prop_assert!((0.0..=1.0).contains(&s.level));
    }
    for e in &agent.relationships {
        prop_assert!((-1.0..=1.0).contains(&e.warmth));
        prop_assert!((-1.0..=1.0).contains(&e.trust));
        prop_assert!((0.0..=1.0).contains(&e.tension));
        prop_assert!((0.0..=1.0).contains(&e.familiarity));
    }
    for a in &agent.arcs {
        prop_assert!((0.0..=1.0).contains(&a.intensity));
    }
    for i in &agent.intentions {
        prop_assert!((0.0..=1.0).contains(&i.priority));
    }
    for m in &agent.memories {
        prop_assert!((0.0..=1.0).contains(&m.salience));
    }
    Ok(())
}

// ============================================================================
// Pipeline properties
// ============================================================================

proptest! {
    /// Every bounded field stays in range after every cycle.
    #[test]
    fn cycles_keep_state_bounded(
        agent in arb_agent(),
        cycles in proptest::collection::vec(proptest::collection::vec(arb_event(), 0..12), 1..8),
    ) {
        let system = LimbicSystem::default();
        let mut agent = agent;
        for events in &cycles {
            system.process(&mut agent, events);
            assert_bounded(&agent)?;
        }
    }

    /// Identical (state, events) always yields identical state.
    #[test]
    fn process_is_deterministic(
        agent in arb_agent(),
        events in proptest::collection::vec(arb_event(), 0..12),
    ) {
        let system = LimbicSystem::new(AnimusConfig::default());
        let mut a = agent.clone();
        let mut b = agent;
        let oa = system.process(&mut a, &events);
        let ob = system.process(&mut b, &events);
        prop_assert_eq!(a, b);
        prop_assert_eq!(oa, ob);
    }

    /// Memories are append-only: earlier entries never change.
    #[test]
    fn memories_only_grow(
        agent in arb_agent(),
        cycles in proptest::collection::vec(proptest::collection::vec(arb_event(), 0..6), 1..6),
    ) {
        let system = LimbicSystem::default();
        let mut agent = agent;
        for events in &cycles {
            let before = agent.memories.clone();
            system.process(&mut agent, events);
            prop_assert!(agent.memories.len() >= before.len());
            prop_assert_eq!(&agent.memories[..before.len()], &before[..]);
        }
    }
}

// ============================================================================
// Homeostasis
// ============================================================================

proptest! {
    /// With no events, every drive's distance to baseline is non-increasing
    /// and the level never crosses the baseline.
    #[test]
    fn homeostasis_converges_without_overshoot(level in 0.0f32..=1.0) {
        let laws = LawConfig::default();
        let mut set = animus_core::DriveSet::default();
        set.set_level(Drive::Safety, level);
        let side = (level - laws.drive_baseline).signum();
        let mut gap = (level - laws.drive_baseline).abs();
        for _ in 0..500 {
            drives::homeostasis(&mut set, &laws);
            let now = set.level(Drive::Safety) - laws.drive_baseline;
            prop_assert!(now.abs() <= gap + 1e-6);
            if now.abs() > 1e-4 {
                prop_assert_eq!(now.signum(), side);
            }
            gap = now.abs();
        }
    }

    /// Passive relationship drift never grows warmth, tension or familiarity.
    #[test]
    fn drift_is_contractive(w in -1.0f32..=1.0, t in 0.0f32..=1.0, f in 0.0f32..=1.0) {
        let mut edges = vec![RelationshipEdge::new(CounterpartRef::agent("bram"))];
        edges[0].warmth = w;
        edges[0].tension = t;
        edges[0].familiarity = f;
        relationships::drift(&mut edges, &LawConfig::default());
        prop_assert!(edges[0].warmth.abs() <= w.abs());
        prop_assert!(edges[0].tension <= t);
        prop_assert!(edges[0].familiarity <= f);
    }
}

/// One interaction then one homeostasis step: 0.5 → 0.6 → 0.599.
#[test]
fn interaction_then_drift_reference_values() {
    let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let mut set = animus_core::DriveSet::default();
    drives::apply_events(&mut set, &[Event::new(EventKind::Interaction, "hello", ts)]);
    assert!((set.level(Drive::Relatedness) - 0.6).abs() < 1e-6);
    drives::homeostasis(&mut set, &LawConfig::default());
    assert!((set.level(Drive::Relatedness) - 0.599).abs() < 1e-6);
}

/// warmth 0.5, tension 0.3, volatility 0 after one conflict: 0.4 / 0.4.
#[test]
fn conflict_edge_reference_values() {
    let mut edge = RelationshipEdge::new(CounterpartRef::agent("bram"));
    edge.warmth = 0.5;
    edge.tension = 0.3;
    relationships::apply_event(&mut edge, &EventKind::Conflict);
    assert!((edge.warmth - 0.4).abs() < 1e-6);
    assert!((edge.tension - 0.4).abs() < 1e-6);
}
