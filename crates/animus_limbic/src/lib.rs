//! # Animus Limbic
//!
//! Deterministic per-cycle update laws. Each law is a plain function over a
//! slice of the agent state, the cycle's events and an immutable config;
//! [`LimbicSystem`] runs them in a fixed order.
//!
//! ## Time scales
//!
//! - Fast (per cycle): drive deltas, mood, energy
//! - Medium: relationship drift, intention decay
//! - Slow: arc decay, homeostasis

pub mod arcs;
pub mod drives;
pub mod energy;
pub mod intentions;
pub mod memory;
pub mod mood;
pub mod relationships;
mod system;

pub use drives::DriveDeltas;
pub use intentions::IntentionChanges;
pub use system::{CycleOutcome, LimbicSystem};
