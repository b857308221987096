//! The end-to-end cycle: deterministic updates, scoring, the eligibility
//! gate, and at most one generative invocation.
//!
//! `run_cycle` never fails. Anything that goes wrong after the deterministic
//! pass is recorded in [`CycleReport::errors`] and the updates already made
//! stay in place. Only an applied response starts the invocation cooldown;
//! a failed, timed-out or rejected call leaves the gate as it was.

use crate::collaborators::{local_recall, MemorySearch, ResponseCache};
use crate::decode::{DecodeReport, SemanticDecoder};
use crate::encode::{EncodedContext, SemanticEncoder};
use crate::llm::{GenerativeCapability, GenerativeResponse};
use crate::prompts::ContextAssembler;
use crate::safety::ResponseValidator;
use animus_core::{Agent, AnimusConfig, AnimusError, Event, Significance};
use animus_expression::{
    significance, BehavioralChoice, EligibilityGate, EligibilityResult, MeaningfulnessScore,
    MeaningfulnessScorer, PerceptionContext, SalienceEngine, SalienceMap,
};
use animus_limbic::{CycleOutcome, LimbicSystem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Everything the caller supplies for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleInput {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub perception: PerceptionContext,
    #[serde(default)]
    pub choices: Vec<BehavioralChoice>,
    pub now: DateTime<Utc>,
}

impl CycleInput {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            events: Vec::new(),
            perception: PerceptionContext::default(),
            choices: Vec::new(),
            now,
        }
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn with_perception(mut self, perception: PerceptionContext) -> Self {
        self.perception = perception;
        self
    }

    pub fn with_choice(mut self, choice: BehavioralChoice) -> Self {
        self.choices.push(choice);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    /// Validated and decoded.
    Applied,
    /// Failed validation; nothing decoded.
    Rejected,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationReport {
    pub context_hash: Uuid,
    /// Served from the response cache instead of the capability.
    pub cached: bool,
    pub status: InvocationStatus,
    pub text: Option<String>,
    pub decode: Option<DecodeReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    pub limbic: CycleOutcome,
    pub salience: SalienceMap,
    pub meaningfulness: MeaningfulnessScore,
    pub significance: Significance,
    pub eligibility: EligibilityResult,
    pub invocation: Option<InvocationReport>,
    pub errors: Vec<String>,
}

impl CycleReport {
    pub fn invoked(&self) -> bool {
        self.invocation.is_some()
    }

    pub fn applied(&self) -> bool {
        matches!(
            self.invocation,
            Some(InvocationReport {
                status: InvocationStatus::Applied,
                ..
            })
        )
    }
}

// ============================================================================
// Engine
// ============================================================================

pub struct CycleEngine {
    config: AnimusConfig,
    limbic: LimbicSystem,
    salience: SalienceEngine,
    scorer: MeaningfulnessScorer,
    gate: EligibilityGate,
    validator: ResponseValidator,
    capability: Arc<dyn GenerativeCapability>,
    cache: Option<Arc<dyn ResponseCache>>,
    search: Option<Arc<dyn MemorySearch>>,
}

impl CycleEngine {
    pub fn new(config: AnimusConfig, capability: Arc<dyn GenerativeCapability>) -> Self {
        Self {
            limbic: LimbicSystem::new(config.clone()),
            salience: SalienceEngine::new(config.salience.clone()),
            scorer: MeaningfulnessScorer::new(config.meaning.clone()),
            gate: EligibilityGate::from_config(&config),
            validator: ResponseValidator::new(),
            capability,
            cache: None,
            search: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_memory_search(mut self, search: Arc<dyn MemorySearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn config(&self) -> &AnimusConfig {
        &self.config
    }

    /// Run one cycle for `agent`.
    pub async fn run_cycle(&self, agent: &mut Agent, input: CycleInput) -> CycleReport {
        let limbic = self.limbic.process(agent, &input.events);
        let salience = self.salience.score(agent, &input.perception);
        let meaningfulness = self.scorer.score(agent, &salience);
        let significance = significance::classify(&input.events);
        let eligibility = self.gate.evaluate(
            &meaningfulness,
            significance,
            &input.choices,
            agent.last_invocation,
            input.now,
        );

        let mut report = CycleReport {
            agent_id: agent.id.clone(),
            timestamp: input.now,
            limbic,
            salience,
            meaningfulness,
            significance,
            eligibility,
            invocation: None,
            errors: Vec::new(),
        };

        if !report.eligibility.eligible {
            tracing::debug!("[{}] not eligible: {}", agent.id, report.eligibility.reason());
            return report;
        }

        tracing::info!(
            "[{}] eligible (M={:.2}, {}), consulting {}",
            agent.id,
            report.meaningfulness.score,
            significance.as_str(),
            self.capability.name()
        );
        let invocation = self
            .invoke(agent, &input, &report.limbic.memories_created, &mut report.errors)
            .await;
        report.invocation = Some(invocation);
        report
    }

    async fn invoke(
        &self,
        agent: &mut Agent,
        input: &CycleInput,
        fresh_memories: &[Uuid],
        errors: &mut Vec<String>,
    ) -> InvocationReport {
        let happenings: Vec<String> = input
            .events
            .iter()
            .map(|e| e.description.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        let memories = self.recall(agent, &happenings, fresh_memories).await;
        let context = SemanticEncoder::encode(agent, &happenings, &memories);
        let context_hash = context.context_hash();

        let cached = self.cached_response(&agent.id, &context_hash, input.now).await;
        let from_cache = cached.is_some();
        let result = match cached {
            Some(resp) => Ok(resp),
            None => self.call(agent, &context).await,
        };

        let mut report = InvocationReport {
            context_hash,
            cached: from_cache,
            status: InvocationStatus::Failed,
            text: None,
            decode: None,
        };

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("[{}] {}", agent.id, e);
                report.status = match e {
                    AnimusError::Timeout(_) => InvocationStatus::TimedOut,
                    AnimusError::InvalidResponse { .. } => InvocationStatus::Rejected,
                    _ => InvocationStatus::Failed,
                };
                errors.push(e.to_string());
                return report;
            }
        };

        match self.validator.validate(&response) {
            Ok(valid) => {
                if !from_cache {
                    self.store_response(&agent.id, &context_hash, &response, input.now).await;
                }
                agent.last_invocation = Some(input.now);
                self.record_cooldown(&agent.id, input.now).await;
                let decode = SemanticDecoder::apply(agent, &valid);
                tracing::debug!(
                    "[{}] decoded {} stance(s), {} intention update(s)",
                    agent.id,
                    decode.stances_applied.len(),
                    decode.intentions_applied.len()
                );
                report.status = InvocationStatus::Applied;
                report.text = Some(valid.text);
                report.decode = Some(decode);
            }
            Err(e) => {
                report.status = InvocationStatus::Rejected;
                errors.push(e.to_string());
            }
        }
        report
    }

    async fn call(&self, agent: &Agent, context: &EncodedContext) -> Result<GenerativeResponse, AnimusError> {
        let request = ContextAssembler::build_request(agent, context);
        let limit = Duration::from_secs(self.config.generation.timeout_secs);
        match tokio::time::timeout(limit, self.capability.generate(&request)).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(e)) => match e.downcast::<AnimusError>() {
                Ok(err @ AnimusError::InvalidResponse { .. }) => Err(err),
                Ok(err) => Err(AnimusError::Generation(err.to_string())),
                Err(e) => Err(AnimusError::Generation(format!("{:#}", e))),
            },
            Err(_) => Err(AnimusError::Timeout(limit)),
        }
    }

    /// Prior memories for the context. Memories recorded in this same cycle
    /// are already present as happenings and are left out.
    async fn recall(&self, agent: &Agent, happenings: &[String], fresh: &[Uuid]) -> Vec<String> {
        let limit = self.config.generation.recall_limit;
        let query = happenings.join(" ");

        if let Some(search) = &self.search {
            if search.is_available().await {
                match search.recall(&agent.id, &query, limit).await {
                    Ok(found) => {
                        return found
                            .into_iter()
                            .filter(|m| !happenings.contains(m))
                            .take(limit)
                            .collect();
                    }
                    Err(e) => warn_collaborator("memory_search", e),
                }
            }
        }

        let prior: Vec<_> = agent
            .memories
            .iter()
            .filter(|m| !fresh.contains(&m.id))
            .cloned()
            .collect();
        local_recall(&prior, &query, limit)
    }

    async fn cached_response(&self, agent_id: &str, hash: &Uuid, now: DateTime<Utc>) -> Option<GenerativeResponse> {
        let cache = self.cache.as_ref()?;
        if !cache.is_available().await {
            return None;
        }
        match cache.get_response(agent_id, hash, now).await {
            Ok(hit) => {
                if hit.is_some() {
                    tracing::debug!("[{}] response cache hit", agent_id);
                }
                hit
            }
            Err(e) => {
                warn_collaborator("response_cache", e);
                None
            }
        }
    }

    async fn store_response(&self, agent_id: &str, hash: &Uuid, response: &GenerativeResponse, now: DateTime<Utc>) {
        let Some(cache) = &self.cache else { return };
        if !cache.is_available().await {
            return;
        }
        let ttl = chrono::Duration::seconds(self.config.generation.cache_ttl_secs as i64);
        if let Err(e) = cache.put_response(agent_id, hash, response, now + ttl).await {
            warn_collaborator("response_cache", e);
        }
    }

    async fn record_cooldown(&self, agent_id: &str, now: DateTime<Utc>) {
        let Some(cache) = &self.cache else { return };
        if !cache.is_available().await {
            return;
        }
        let until = now + chrono::Duration::seconds(self.config.gate.cooldown_secs);
        if let Err(e) = cache.set_cooldown(agent_id, until).await {
            warn_collaborator("response_cache", e);
        }
    }
}

fn warn_collaborator(name: &'static str, e: anyhow::Error) {
    tracing::warn!(
        "{}",
        AnimusError::Collaborator {
            name,
            reason: format!("{:#}", e),
        }
    );
}
