use serde::{Deserialize, Serialize};

/// Body for creating or editing a message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageContent {
    pub content: String,
}

/// Body for starting a thread from an existing message.
#[derive(Debug, Clone, Serialize)]
pub struct StartThread {
    pub name: String,
    /// Minutes of inactivity before the thread auto-archives (60, 1440, 4320, 10080).
    pub auto_archive_duration: u32,
}

/// The subset of a Discord message the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
}

/// The subset of a Discord channel (or thread) the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub thread_metadata: Option<ThreadMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub locked: bool,
}

/// Body of a 429 response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RateLimitBody {
    pub retry_after: f64,
}
