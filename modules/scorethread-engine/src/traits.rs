// Trait seams between the reconciliation engine and the outside world.
//
// ObservationSource: where raw match records come from (scraped page, JSON API).
// ThreadGateway: the messaging-platform operations the reconciler drives.
//
// Mocks for both live in `testing`, so the whole cycle runs without network.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ExternalId, RawObservation, ThreadBinding};

#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch this poll's raw match records. `Ok(vec![])` means no matches
    /// right now; `Err` means the source could not be read.
    async fn fetch_observations(&self) -> Result<Vec<RawObservation>>;
}

/// Identifiers of a freshly created thread and its starter message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedThread {
    pub thread_id: ExternalId,
    pub starter_message_id: ExternalId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited,
    NotFound,
}

#[async_trait]
pub trait ThreadGateway: Send + Sync {
    /// Post `initial_text` and open a thread on it named `suggested_name`.
    async fn create_thread(&self, initial_text: &str, suggested_name: &str)
        -> Result<CreatedThread>;

    /// Check that the bound thread and its starter message still exist.
    async fn resolve_binding(&self, binding: &ThreadBinding) -> Result<Resolution>;

    /// Replace the text of a starter message.
    async fn edit_message(&self, message_id: &ExternalId, text: &str) -> Result<EditOutcome>;
}
