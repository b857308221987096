pub mod scripted;

pub use scripted::{ScriptedProvider, ScriptedReply};
