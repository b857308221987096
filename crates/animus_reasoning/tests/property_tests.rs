//! Property-based tests for the semantic boundary.
//!
//! Decode must never invent a mapping, the validator must never let a
//! numeric state assignment through, and encoding must never leak a digit.

use animus_core::{
    Agent, CounterpartRef, Drive, EmotionalArc, Horizon, Intention, IntentionKind, Mood, RelationshipEdge,
};
use animus_reasoning::decode::{apply_stance, normalize_key, STANCE_KEYS};
use animus_reasoning::{GenerativeResponse, ResponseValidator, SemanticEncoder};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_edge() -> impl Strategy<Value = RelationshipEdge> {
    (
        -1.0f32..=1.0,
        -1.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
    )
        .prop_map(|(warmth, trust, tension, attraction, familiarity, comfort, volatility)| {
            let mut e = RelationshipEdge::new(CounterpartRef::agent("bram")).named("Bram");
            e.warmth = warmth;
            e.trust = trust;
            e.tension = tension;
            e.attraction = attraction;
            e.familiarity = familiarity;
            e.comfort = comfort;
            e.volatility = volatility;
            e
        })
}

fn arb_unknown_key() -> impl Strategy<Value = String> {
    "[a-zA-Z _-]{1,24}".prop_filter("must not be a known stance", |k| {
        !STANCE_KEYS.contains(&normalize_key(k).as_str())
    })
}

const STATE_WORDS: [&str; 8] = [
    "trust", "warmth", "tension", "energy", "valence", "arousal", "safety", "relatedness",
];

fn arb_agent() -> impl Strategy<Value = Agent> {
    (
        proptest::collection::vec(0.0f32..=1.0, 5),
        -1.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
        proptest::collection::vec(arb_edge(), 0..3),
        proptest::collection::vec(0.0f32..=1.0, 0..3),
        proptest::collection::vec((0.0f32..=1.0, 0usize..6), 0..3),
    )
        .prop_map(|(levels, valence, arousal, energy, edges, arcs, intentions)| {
            let mut agent = Agent::new("mara", "Mara");
            for (d, level) in Drive::ALL.iter().zip(levels) {
                agent.drives.set_level(*d, level);
            }
            agent.mood = Mood::new(valence, arousal);
            agent.energy = energy;
            agent.relationships = edges;
            agent.arcs = arcs
                .into_iter()
                .map(|i| EmotionalArc::new("the flood", &["flood"], i))
                .collect();
            let kinds = [
                IntentionKind::Obligation,
                IntentionKind::Avoid,
                IntentionKind::Raise,
                IntentionKind::Support,
                IntentionKind::Protect,
                IntentionKind::Distance,
            ];
            agent.intentions = intentions
                .into_iter()
                .map(|(p, k)| Intention::new(kinds[k], "mend the nets", p, Horizon::Medium))
                .collect();
            agent
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn unknown_stance_changes_nothing(edge in arb_edge(), key in arb_unknown_key()) {
        let mut after = edge.clone();
        prop_assert!(!apply_stance(&mut after, &key));
        prop_assert_eq!(after, edge);
    }

    #[test]
    fn known_stance_stays_in_range(edge in arb_edge(), idx in 0usize..STANCE_KEYS.len(), reps in 1usize..30) {
        let mut e = edge;
        for _ in 0..reps {
            apply_stance(&mut e, STANCE_KEYS[idx]);
        }
        prop_assert!((-1.0..=1.0).contains(&e.warmth));
        prop_assert!((-1.0..=1.0).contains(&e.trust));
        for v in [e.tension, e.attraction, e.comfort] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn numeric_assignment_always_rejected(
        prefix in "[a-zA-Z ,]{0,30}",
        word_idx in 0usize..STATE_WORDS.len(),
        value in -100.0f32..100.0,
        suffix in "[a-zA-Z ,]{0,30}",
        with_valid_items in any::<bool>(),
    ) {
        let text = format!("{} {} = {:.2} {}", prefix, STATE_WORDS[word_idx], value, suffix);
        let mut resp = GenerativeResponse::text(text);
        if with_valid_items {
            resp = resp
                .with_stance("Bram", "warming")
                .with_intention("create", "support", "help with the harvest", "short");
        }
        prop_assert!(ResponseValidator::new().validate(&resp).is_err());
    }

    #[test]
    fn numeric_statement_with_filler_rejected(
        word_idx in 0usize..STATE_WORDS.len(),
        filler in "[a-zA-Z ]{0,30}",
        op_idx in 0usize..6,
        value in 0.0f32..100.0,
        percent in any::<bool>(),
    ) {
        let ops = ["is", "is now", "sits at", "rose to", "", "="];
        let text = format!(
            "Her {} {} {} {:.1}{}.",
            STATE_WORDS[word_idx],
            filler,
            ops[op_idx],
            value,
            if percent { "%" } else { "" }
        );
        prop_assert!(ResponseValidator::new().validate(&GenerativeResponse::text(text)).is_err());
    }

    #[test]
    fn encoded_context_has_no_digits(agent in arb_agent()) {
        let ctx = SemanticEncoder::encode(&agent, &["The river rose overnight.".to_string()], &[]);
        let text = ctx.render();
        prop_assert!(!text.chars().any(|c| c.is_ascii_digit()), "{}", text);
    }

    #[test]
    fn encoding_is_byte_identical(agent in arb_agent()) {
        let a = SemanticEncoder::encode(&agent, &[], &[]);
        let b = SemanticEncoder::encode(&agent.clone(), &[], &[]);
        prop_assert_eq!(a.render(), b.render());
        prop_assert_eq!(a.context_hash(), b.context_hash());
    }
}
