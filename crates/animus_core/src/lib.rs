//! # Animus core
//!
//! Shared vocabulary for the NPC psychology core: the agent state model, the
//! event vocabulary, the global event → drive-effect table, configuration and
//! typed errors. Update laws live in `animus_limbic`, scoring and gating in
//! `animus_expression`, the generative boundary in `animus_reasoning`.

pub mod affect;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod event;
pub mod state;

pub use affect::Mood;
pub use config::{
    AnimusConfig, GateConfig, GenerationConfig, LawConfig, MeaningConfig, MemoryConfig,
    SalienceConfig,
};
pub use dynamics::{drive_effect, DriveEffect};
pub use error::AnimusError;
pub use event::{AgentId, CounterpartRef, Event, EventKind, Significance};
pub use state::{
    Agent, Drive, DriveSet, DriveState, EmotionalArc, Horizon, Intention, IntentionKind, Memory,
    MemoryKind, Personality, RelationshipEdge,
};
