//! Scripted provider: deterministic replies for tests and offline runs.
//!
//! Each call pops the next scripted reply. When the script is exhausted the
//! provider answers with an empty response.

use crate::extraction::parse_response;
use crate::llm::{GenerativeCapability, GenerativeRequest, GenerativeResponse};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedReply {
    /// Return this structured response as-is.
    Respond { response: GenerativeResponse },
    /// Return raw text, parsed leniently like a chat backend's reply. A
    /// malformed structured block fails the call with `InvalidResponse`.
    Raw { text: String },
    /// Fail the call.
    Fail { reason: String },
    /// Sleep before answering with an empty response.
    Stall { secs: u64 },
}

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<GenerativeRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider scripted with a single response.
    pub fn respond(response: GenerativeResponse) -> Self {
        Self::new(vec![ScriptedReply::Respond { response }])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<GenerativeRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl GenerativeCapability for ScriptedProvider {
    async fn generate(&self, request: &GenerativeRequest) -> Result<GenerativeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let next = self.replies.lock().await.pop_front();
        match next {
            None => Ok(GenerativeResponse::default()),
            Some(ScriptedReply::Respond { response }) => Ok(response),
            Some(ScriptedReply::Raw { text }) => Ok(parse_response(&text)?),
            Some(ScriptedReply::Fail { reason }) => bail!("scripted failure: {}", reason),
            Some(ScriptedReply::Stall { secs }) => {
                tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
                Ok(GenerativeResponse::default())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerativeRequest {
        GenerativeRequest {
            agent_id: "mara".into(),
            instructions: String::new(),
            context: "Mara is calm.".into(),
        }
    }

    #[tokio::test]
    async fn test_replies_in_order_then_empty() {
        let provider = ScriptedProvider::new(vec![
            ScriptedReply::Respond {
                response: GenerativeResponse::text("first"),
            },
            ScriptedReply::Raw {
                text: "```json\n{\"text\": \"second\"}\n```".into(),
            },
        ]);
        assert_eq!(provider.generate(&request()).await.unwrap().text, "first");
        assert_eq!(provider.generate(&request()).await.unwrap().text, "second");
        assert_eq!(provider.generate(&request()).await.unwrap(), GenerativeResponse::default());
        assert_eq!(provider.calls(), 3);
        assert_eq!(provider.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_fail() {
        let provider = ScriptedProvider::new(vec![ScriptedReply::Fail {
            reason: "offline".into(),
        }]);
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_reply_deserializes_from_scenario_json() {
        let reply: ScriptedReply =
            serde_json::from_str(r#"{"kind": "raw", "text": "hello"}"#).unwrap();
        assert_eq!(reply, ScriptedReply::Raw { text: "hello".into() });
    }
}
