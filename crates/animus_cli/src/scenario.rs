//! Scenario files: hydrated agents, their per-cycle inputs and the scripted
//! replies standing in for a generative backend.

use animus_core::{Agent, AnimusConfig};
use animus_reasoning::{CycleEngine, CycleInput, CycleReport, InMemoryResponseCache, ScriptedProvider, ScriptedReply};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Spacing of the idle cycles appended when more cycles are requested than
/// a script lists.
const IDLE_STEP_SECS: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Clock start for agents whose script lists no cycles.
    #[serde(default)]
    pub start: DateTime<Utc>,
    pub agents: Vec<AgentScript>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentScript {
    pub agent: Agent,
    #[serde(default)]
    pub cycles: Vec<CycleInput>,
    #[serde(default)]
    pub replies: Vec<ScriptedReply>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let scenario: Scenario =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Agent ids key the shared response cache, so they must be unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for script in &self.agents {
            if !seen.insert(script.agent.id.as_str()) {
                bail!("duplicate agent id '{}' in scenario", script.agent.id);
            }
        }
        Ok(())
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().map(|s| &s.agent).find(|a| a.id == id)
    }
}

/// The scripted inputs, truncated or padded with idle cycles to `total`.
pub fn plan_cycles(inputs: &[CycleInput], total: Option<usize>, start: DateTime<Utc>) -> Vec<CycleInput> {
    let Some(total) = total else {
        return inputs.to_vec();
    };
    let step = Duration::seconds(IDLE_STEP_SECS);
    let mut planned: Vec<CycleInput> = inputs.iter().take(total).cloned().collect();
    let mut next = planned.last().map(|c| c.now + step).unwrap_or(start);
    while planned.len() < total {
        planned.push(CycleInput::new(next));
        next += step;
    }
    planned
}

pub struct AgentRun {
    pub agent: Agent,
    pub reports: Vec<CycleReport>,
}

/// Run every agent's cycles. Agents run concurrently, each owning its own
/// state; results come back in scenario order.
pub async fn run(config: &AnimusConfig, scenario: Scenario, total: Option<usize>) -> Result<Vec<AgentRun>> {
    let cache = Arc::new(InMemoryResponseCache::new());
    let mut tasks = JoinSet::new();

    for (idx, script) in scenario.agents.into_iter().enumerate() {
        let inputs = plan_cycles(&script.cycles, total, scenario.start);
        let provider = Arc::new(ScriptedProvider::new(script.replies));
        let engine = CycleEngine::new(config.clone(), provider).with_cache(cache.clone());
        let mut agent = script.agent;

        tasks.spawn(async move {
            agent.normalize();
            let mut reports = Vec::with_capacity(inputs.len());
            for input in inputs {
                reports.push(engine.run_cycle(&mut agent, input).await);
            }
            tracing::debug!("[{}] finished {} cycle(s)", agent.id, reports.len());
            (idx, AgentRun { agent, reports })
        });
    }

    let mut runs = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (idx, run) = joined.context("agent task failed")?;
        if let Some(until) = cache.cooldown_until(&run.agent.id).await {
            tracing::debug!("[{}] cooldown until {}", run.agent.id, until);
        }
        runs.push((idx, run));
    }
    runs.sort_by_key(|(idx, _)| *idx);
    Ok(runs.into_iter().map(|(_, run)| run).collect())
}

/// One line per cycle for humans.
pub fn summarize(report: &CycleReport, cycle: usize) -> String {
    let mut head = format!(
        "[{}] cycle {}: M={:.2} {}",
        report.agent_id,
        cycle,
        report.meaningfulness.score,
        report.significance.as_str()
    );
    if let Some((category, id, score)) = report.salience.focus() {
        head.push_str(&format!(" focus={}:{}({:.2})", category, id, score));
    }
    match &report.invocation {
        None => format!("{} | not eligible: {}", head, report.eligibility.reason()),
        Some(inv) => {
            let mut line = format!("{} | {:?}", head, inv.status);
            if inv.cached {
                line.push_str(" (cached)");
            }
            if let Some(decode) = &inv.decode {
                line.push_str(&format!(
                    " | {} stance(s), {} intention update(s)",
                    decode.stances_applied.len(),
                    decode.intentions_applied.len()
                ));
            }
            if let Some(text) = &inv.text {
                line.push_str(&format!(" | \"{}\"", text));
            }
            for err in &report.errors {
                line.push_str(&format!(" | error: {}", err));
            }
            line
        }
    }
}
