//! # Animus Reasoning
//!
//! The semantic boundary between numeric agent state and a generative
//! capability, and the cycle engine that drives it.
//!
//! ```text
//! Agent ──encode──▶ words ──▶ capability ──▶ response
//!                                              │
//!                                          validate
//!                                              │
//! Agent ◀──decode (fixed tables)───────────────┘
//! ```
//!
//! Numbers never leave the core and only table-bound updates come back.

pub mod collaborators;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod extraction;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod safety;

pub use collaborators::{local_recall, InMemoryResponseCache, MemorySearch, ResponseCache};
pub use decode::{DecodeReport, SemanticDecoder};
pub use encode::{EncodedContext, SemanticEncoder};
pub use engine::{CycleEngine, CycleInput, CycleReport, InvocationReport, InvocationStatus};
pub use llm::{GenerativeCapability, GenerativeRequest, GenerativeResponse, IntentionUpdate, StanceShift};
pub use providers::{ScriptedProvider, ScriptedReply};
pub use safety::{ResponseValidator, ValidatedResponse};
