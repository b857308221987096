//! # Animus Expression
//!
//! Decides whether a cycle is worth consulting the generative capability:
//! salience per category, a single meaningfulness score, the cycle's
//! significance tier, and the four-factor eligibility gate.

pub mod attention;
pub mod eligibility;
pub mod meaning;
pub mod significance;

pub use attention::{
    ObjectInView, PerceptionContext, PersonInView, Proximity, Relevance, SalienceEngine, SalienceMap,
};
pub use eligibility::{BehavioralChoice, EligibilityGate, EligibilityResult};
pub use meaning::{MeaningfulnessScore, MeaningfulnessScorer};
