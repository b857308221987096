//! Property-based tests for animus_expression.

use animus_core::{Agent, CounterpartRef, Drive, EmotionalArc, RelationshipEdge, Significance};
use animus_expression::{
    BehavioralChoice, EligibilityGate, MeaningfulnessScorer, PerceptionContext, Proximity,
    Relevance, SalienceEngine,
};
use chrono::{DateTime, Duration};
use proptest::prelude::*;

fn arb_agent() -> impl Strategy<Value = Agent> {
    (
        proptest::collection::vec(0.0f32..=1.0, 5),
        0.0f32..=1.0,
        0.0f32..=1.0,
        (-1.0f32..=1.0, -1.0f32..=1.0, 0.0f32..=1.0),
    )
        .prop_map(|(levels, energy, arc, (w, t, tn))| {
            let mut agent = Agent::new("mara", "Mara");
            for (i, d) in Drive::ALL.iter().enumerate() {
                agent.drives.set_level(*d, levels[i]);
            }
            agent.energy = energy;
            agent.arcs.push(EmotionalArc::new("flood", &["flood", "river"], arc));
            let mut edge = RelationshipEdge::new(CounterpartRef::agent("bram"));
            edge.warmth = w;
            edge.trust = t;
            edge.tension = tn;
            agent.relationships.push(edge);
            agent
        })
}

fn arb_proximity() -> impl Strategy<Value = Proximity> {
    prop_oneof![
        Just(Proximity::PhysicallyPresent),
        Just(Proximity::Nearby),
        Just(Proximity::Mentioned),
        Just(Proximity::Background),
    ]
}

fn perception(p: Proximity) -> PerceptionContext {
    PerceptionContext::default()
        .with_person(CounterpartRef::agent("bram"), p)
        .with_topic("flood")
        .with_object("lantern", Relevance::Important)
}

proptest! {
    /// Every salience score and M stay within [0, 1].
    #[test]
    fn scores_are_bounded(agent in arb_agent(), p in arb_proximity()) {
        let map = SalienceEngine::default().score(&agent, &perception(p));
        for v in map.people.values()
            .chain(map.topics.values())
            .chain(map.objects.values())
            .chain(map.drives.values())
            .chain(map.arcs.values())
        {
            prop_assert!((0.0..=1.0).contains(v));
        }
        let m = MeaningfulnessScorer::default().score(&agent, &map);
        prop_assert!((0.0..=1.0).contains(&m.score));
    }

    /// Same inputs, same salience, M and verdict.
    #[test]
    fn scoring_and_gate_are_deterministic(
        agent in arb_agent(),
        p in arb_proximity(),
        stakes in 0.0f32..=1.0,
        ago in proptest::option::of(0i64..1000),
    ) {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let last = ago.map(|s| now - Duration::seconds(s));
        let choices = vec![BehavioralChoice::new("act", "", stakes)];
        let run = || {
            let map = SalienceEngine::default().score(&agent, &perception(p));
            let m = MeaningfulnessScorer::default().score(&agent, &map);
            let r = EligibilityGate::default().evaluate(&m, Significance::Significant, &choices, last, now);
            (map, m, r)
        };
        prop_assert_eq!(run(), run());
    }

    /// The verdict is exactly the conjunction of the four factors, and every
    /// false factor contributes one reason.
    #[test]
    fn verdict_is_conjunction(
        score in 0.0f32..=1.0,
        sig in 0usize..4,
        stakes in 0.0f32..=1.0,
        ago in proptest::option::of(0i64..1000),
    ) {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let significance = [
            Significance::Trivial,
            Significance::Moderate,
            Significance::Significant,
            Significance::Critical,
        ][sig];
        let m = animus_expression::MeaningfulnessScore { score, ..Default::default() };
        let r = EligibilityGate::default().evaluate(
            &m,
            significance,
            &[BehavioralChoice::new("act", "", stakes)],
            ago.map(|s| now - Duration::seconds(s)),
            now,
        );
        let factors = [r.meaningful, r.non_trivial, r.cooled_down, r.has_stakes];
        prop_assert_eq!(r.eligible, factors.iter().all(|f| *f));
        prop_assert_eq!(r.reasons.len(), factors.iter().filter(|f| !**f).count());
    }
}
