//! The generative capability boundary.
//!
//! Anything that turns an encoded context into prose plus structured updates
//! implements [`GenerativeCapability`]. The core treats it as opaque and
//! untrusted: every response goes through the validator before decode.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request for one agent: the fixed instruction contract plus the
/// rendered, number-free context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeRequest {
    pub agent_id: String,
    pub instructions: String,
    pub context: String,
}

/// "Shift my stance toward `counterpart` in the direction `stance`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceShift {
    /// Display name of the counterpart as it appears in the context.
    pub counterpart: String,
    /// Key into the stance table, e.g. `warming`.
    pub stance: String,
}

/// Raw intention update as produced by the capability. Fields stay strings
/// until the validator has checked them against the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentionUpdate {
    pub operation: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub horizon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerativeResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub stance_shifts: Vec<StanceShift>,
    #[serde(default)]
    pub intention_updates: Vec<IntentionUpdate>,
}

impl GenerativeResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_stance(mut self, counterpart: &str, stance: &str) -> Self {
        self.stance_shifts.push(StanceShift {
            counterpart: counterpart.to_string(),
            stance: stance.to_string(),
        });
        self
    }

    pub fn with_intention(mut self, operation: &str, kind: &str, description: &str, horizon: &str) -> Self {
        self.intention_updates.push(IntentionUpdate {
            operation: operation.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            horizon: horizon.to_string(),
        });
        self
    }
}

#[async_trait]
pub trait GenerativeCapability: Send + Sync {
    async fn generate(&self, request: &GenerativeRequest) -> Result<GenerativeResponse>;

    fn name(&self) -> &str {
        "generative"
    }
}
