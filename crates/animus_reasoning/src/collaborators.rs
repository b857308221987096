//! Optional collaborators of the cycle engine.
//!
//! Both are probed with `is_available()` before use, and any error falls back
//! to the path that works without them. Their presence may change latency,
//! never outputs.

use crate::llm::GenerativeResponse;
use anyhow::Result;
use async_trait::async_trait;
use animus_core::Memory;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// Response cache
// ============================================================================

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn is_available(&self) -> bool;

    /// A cached response for this exact context, if it has not expired at `now`.
    async fn get_response(&self, agent_id: &str, context_hash: &Uuid, now: DateTime<Utc>) -> Result<Option<GenerativeResponse>>;

    async fn put_response(
        &self,
        agent_id: &str,
        context_hash: &Uuid,
        response: &GenerativeResponse,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Record when this agent's invocation cooldown ends.
    async fn set_cooldown(&self, agent_id: &str, until: DateTime<Utc>) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryResponseCache {
    responses: Mutex<HashMap<(String, Uuid), (GenerativeResponse, DateTime<Utc>)>>,
    cooldowns: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.responses.lock().await.len()
    }

    /// The recorded cooldown expiry for `agent_id`, if any.
    pub async fn cooldown_until(&self, agent_id: &str) -> Option<DateTime<Utc>> {
        self.cooldowns.lock().await.get(agent_id).copied()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get_response(&self, agent_id: &str, context_hash: &Uuid, now: DateTime<Utc>) -> Result<Option<GenerativeResponse>> {
        let mut responses = self.responses.lock().await;
        let key = (agent_id.to_string(), *context_hash);
        match responses.get(&key) {
            Some((resp, expires_at)) if *expires_at > now => Ok(Some(resp.clone())),
            Some(_) => {
                responses.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put_response(
        &self,
        agent_id: &str,
        context_hash: &Uuid,
        response: &GenerativeResponse,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.responses
            .lock()
            .await
            .insert((agent_id.to_string(), *context_hash), (response.clone(), expires_at));
        Ok(())
    }

    async fn set_cooldown(&self, agent_id: &str, until: DateTime<Utc>) -> Result<()> {
        self.cooldowns.lock().await.insert(agent_id.to_string(), until);
        Ok(())
    }
}

// ============================================================================
// Memory search
// ============================================================================

#[async_trait]
pub trait MemorySearch: Send + Sync {
    async fn is_available(&self) -> bool;

    /// Up to `limit` memory descriptions for `agent_id`, most relevant first.
    async fn recall(&self, agent_id: &str, query: &str, limit: usize) -> Result<Vec<String>>;
}

fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase())
        .collect()
}

/// Fallback recall over the agent's own memory list: keyword overlap with
/// the query, then salience, then recency. Memories sharing no keyword are
/// not returned.
pub fn local_recall(memories: &[Memory], query: &str, limit: usize) -> Vec<String> {
    let wanted = keywords(query);
    if wanted.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &Memory)> = memories
        .iter()
        .filter_map(|m| {
            let overlap = keywords(&m.description).intersection(&wanted).count();
            (overlap > 0).then_some((overlap, m))
        })
        .collect();

    scored.sort_by(|(oa, a), (ob, b)| {
        ob.cmp(oa)
            .then(b.salience.partial_cmp(&a.salience).unwrap_or(std::cmp::Ordering::Equal))
            .then(b.timestamp.cmp(&a.timestamp))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, m)| m.description.clone())
        .collect()
}
