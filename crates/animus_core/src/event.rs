//! Event vocabulary.
//!
//! Events arrive from an external source in cycle order. The core never
//! generates them; it only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type AgentId = String;

/// Who an event or relationship edge refers to.
///
/// External users are opaque: the core keeps the agent's stance toward them
/// but never models their psychology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CounterpartRef {
    Agent(AgentId),
    ExternalUser(String),
    #[default]
    System,
}

impl CounterpartRef {
    pub fn agent(id: impl Into<String>) -> Self {
        Self::Agent(id.into())
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::ExternalUser(id.into())
    }

    pub fn is_external_user(&self) -> bool {
        matches!(self, Self::ExternalUser(_))
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl fmt::Display for CounterpartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(id) => write!(f, "agent:{}", id),
            Self::ExternalUser(id) => write!(f, "user:{}", id),
            Self::System => write!(f, "system"),
        }
    }
}

/// Closed set of event types. Anything unrecognised lands in `Unknown` and
/// carries no effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Interaction,
    Conflict,
    Betrayal,
    Achievement,
    Failure,
    IncursionSensory,
    IncursionTemporal,
    CalendarReminder,
    CalendarStart,
    CalendarMissed,
    ActionCompleted,
    Work,
    Disclosure,
    Unknown(String),
}

impl EventKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "interaction" => Self::Interaction,
            "conflict" => Self::Conflict,
            "betrayal" => Self::Betrayal,
            "achievement" => Self::Achievement,
            "failure" => Self::Failure,
            "incursion_sensory" => Self::IncursionSensory,
            "incursion_temporal" => Self::IncursionTemporal,
            "calendar_reminder" => Self::CalendarReminder,
            "calendar_start" => Self::CalendarStart,
            "calendar_missed" => Self::CalendarMissed,
            "action_completed" => Self::ActionCompleted,
            "work" => Self::Work,
            "disclosure" => Self::Disclosure,
            _ => Self::Unknown(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Interaction => "interaction",
            Self::Conflict => "conflict",
            Self::Betrayal => "betrayal",
            Self::Achievement => "achievement",
            Self::Failure => "failure",
            Self::IncursionSensory => "incursion_sensory",
            Self::IncursionTemporal => "incursion_temporal",
            Self::CalendarReminder => "calendar_reminder",
            Self::CalendarStart => "calendar_start",
            Self::CalendarMissed => "calendar_missed",
            Self::ActionCompleted => "action_completed",
            Self::Work => "work",
            Self::Disclosure => "disclosure",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Incursions are world intrusions into the agent's routine.
    pub fn is_incursion(&self) -> bool {
        matches!(self, Self::IncursionSensory | Self::IncursionTemporal)
    }

    /// Default significance tier when the payload does not override it.
    pub fn default_significance(&self) -> Significance {
        match self {
            Self::Betrayal => Significance::Critical,
            Self::Conflict
            | Self::Achievement
            | Self::IncursionSensory
            | Self::IncursionTemporal
            | Self::Disclosure => Significance::Significant,
            Self::Interaction
            | Self::Failure
            | Self::CalendarReminder
            | Self::CalendarStart
            | Self::CalendarMissed => Significance::Moderate,
            Self::ActionCompleted | Self::Work | Self::Unknown(_) => Significance::Trivial,
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered triviality classification used by the eligibility gate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    #[default]
    Trivial,
    Moderate,
    Significant,
    Critical,
}

impl Significance {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trivial" => Some(Self::Trivial),
            "moderate" => Some(Self::Moderate),
            "significant" => Some(Self::Significant),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Moderate => "moderate",
            Self::Significant => "significant",
            Self::Critical => "critical",
        }
    }
}

pub const CORRELATION_KEY: &str = "correlation_key";
pub const SIGNIFICANCE_KEY: &str = "significance";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: CounterpartRef,
    #[serde(default)]
    pub target: CounterpartRef,
    #[serde(default)]
    pub payload: BTreeMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(kind: EventKind, description: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            description: description.into(),
            source: CounterpartRef::System,
            target: CounterpartRef::System,
            payload: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_source(mut self, source: CounterpartRef) -> Self {
        self.source = source;
        self
    }

    pub fn with_target(mut self, target: CounterpartRef) -> Self {
        self.target = target;
        self
    }

    pub fn with_payload(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn with_correlation_key(self, key: &str) -> Self {
        self.with_payload(CORRELATION_KEY, key)
    }

    /// Structured correlation key, if the source attached one.
    pub fn correlation_key(&self) -> Option<&str> {
        self.payload
            .get(CORRELATION_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Payload override wins; otherwise the kind's default tier.
    pub fn significance(&self) -> Significance {
        self.payload
            .get(SIGNIFICANCE_KEY)
            .and_then(|v| v.as_str())
            .and_then(Significance::parse)
            .unwrap_or_else(|| self.kind.default_significance())
    }

    /// True if `who` is this event's source or target.
    pub fn involves(&self, who: &CounterpartRef) -> bool {
        &self.source == who || &self.target == who
    }
}
