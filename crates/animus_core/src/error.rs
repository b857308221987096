use std::time::Duration;
use thiserror::Error;

/// Failure kinds that cross crate seams.
#[derive(Debug, Error)]
pub enum AnimusError {
    #[error("generative capability failed: {0}")]
    Generation(String),

    #[error("generative capability timed out after {0:?}")]
    Timeout(Duration),

    #[error("generative response rejected: {}", .errors.join("; "))]
    InvalidResponse { errors: Vec<String> },

    #[error("collaborator '{name}' failed: {reason}")]
    Collaborator { name: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
