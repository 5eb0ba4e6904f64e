use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use discord_client::{DiscordClient, DiscordError};
use scorethread_engine::{
    CreatedThread, EditOutcome, ExternalId, Resolution, ThreadBinding, ThreadGateway,
};

/// Minutes of inactivity before Discord auto-archives a match thread.
const AUTO_ARCHIVE_MINUTES: u32 = 60;

/// Match threads in one Discord channel. The starter message lives in the
/// parent channel and is the message the bot keeps editing.
pub struct DiscordGateway {
    client: DiscordClient,
    channel_id: String,
}

impl DiscordGateway {
    pub fn new(client: DiscordClient, channel_id: &str) -> Self {
        Self {
            client,
            channel_id: channel_id.to_string(),
        }
    }
}

#[async_trait]
impl ThreadGateway for DiscordGateway {
    async fn create_thread(
        &self,
        initial_text: &str,
        suggested_name: &str,
    ) -> Result<CreatedThread> {
        let message = self
            .client
            .create_message(&self.channel_id, initial_text)
            .await?;

        let thread = match self
            .client
            .start_thread_from_message(&self.channel_id, &message.id, suggested_name, AUTO_ARCHIVE_MINUTES)
            .await
        {
            Ok(thread) => thread,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Posted starter message but thread creation failed");
                return Err(e.into());
            }
        };

        debug!(thread_id = %thread.id, message_id = %message.id, "Opened thread");
        Ok(CreatedThread {
            thread_id: ExternalId::new(thread.id),
            starter_message_id: ExternalId::new(message.id),
        })
    }

    async fn resolve_binding(&self, binding: &ThreadBinding) -> Result<Resolution> {
        match self.client.get_channel(binding.thread_id.as_str()).await {
            Ok(_) => {}
            Err(DiscordError::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(e) => return Err(e.into()),
        }

        match self
            .client
            .get_message(&self.channel_id, binding.starter_message_id.as_str())
            .await
        {
            Ok(_) => Ok(Resolution::Resolved),
            Err(DiscordError::NotFound(_)) => Ok(Resolution::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn edit_message(&self, message_id: &ExternalId, text: &str) -> Result<EditOutcome> {
        match self
            .client
            .edit_message(&self.channel_id, message_id.as_str(), text)
            .await
        {
            Ok(_) => Ok(EditOutcome::Edited),
            Err(DiscordError::NotFound(_)) => Ok(EditOutcome::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
