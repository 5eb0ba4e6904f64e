use std::fmt;

use serde::{Deserialize, Serialize};

/// One unstructured match record as a source adapter saw it this poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObservation {
    pub display_title: String,
    pub status_text: String,
    pub score_text: String,
}

impl RawObservation {
    pub fn new(
        display_title: impl Into<String>,
        status_text: impl Into<String>,
        score_text: impl Into<String>,
    ) -> Self {
        Self {
            display_title: display_title.into(),
            status_text: status_text.into(),
            score_text: score_text.into(),
        }
    }
}

/// Normalized identity of a real-world match. Two observations with the
/// same key are the same match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The cleaned record chosen to represent a match for one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub key: CanonicalKey,
    pub title: String,
    pub status: String,
    pub score: String,
}

impl CanonicalRecord {
    /// Both score and status carry text.
    pub fn is_complete(&self) -> bool {
        !self.score.is_empty() && !self.status.is_empty()
    }
}

/// Opaque identifier handed out by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Links a canonical key to the thread and starter message tracking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadBinding {
    pub key: CanonicalKey,
    pub thread_id: ExternalId,
    pub starter_message_id: ExternalId,
}

/// A decision the reconciler made for one key during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadAction {
    CreateThread {
        key: CanonicalKey,
        text: String,
    },
    UpdateMessage {
        key: CanonicalKey,
        message_id: ExternalId,
        text: String,
    },
    RetireBinding {
        key: CanonicalKey,
    },
}

impl ThreadAction {
    pub fn key(&self) -> &CanonicalKey {
        match self {
            Self::CreateThread { key, .. }
            | Self::UpdateMessage { key, .. }
            | Self::RetireBinding { key } => key,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateThread { .. } => ActionKind::Create,
            Self::UpdateMessage { .. } => ActionKind::Update,
            Self::RetireBinding { .. } => ActionKind::Retire,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Retire,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Retire => write!(f, "retire"),
        }
    }
}

/// A per-key gateway failure recorded during a cycle.
#[derive(Debug, Clone)]
pub struct ActionFailure {
    pub key: CanonicalKey,
    pub kind: ActionKind,
    pub error: String,
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub observed: usize,
    pub canonical: usize,
    pub actions: Vec<ThreadAction>,
    pub failures: Vec<ActionFailure>,
    /// Set when the source failed and the cycle did nothing.
    pub aborted: bool,
}

impl CycleReport {
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observed={} canonical={} created={} updated={} retired={} failures={} aborted={}",
            self.observed,
            self.canonical,
            self.count(ActionKind::Create),
            self.count(ActionKind::Update),
            self.count(ActionKind::Retire),
            self.failures.len(),
            self.aborted,
        )
    }
}
