pub mod error;
pub mod types;

pub use error::{DiscordError, Result};
pub use types::{Channel, Message, MessageContent, StartThread, ThreadMetadata};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use types::RateLimitBody;

const BASE_URL: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = "DiscordBot (https://github.com/scorethread/scorethread, 0.1)";

pub struct DiscordClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, BASE_URL)
    }

    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Post a message to a channel.
    pub async fn create_message(&self, channel_id: &str, content: &str) -> Result<Message> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let body = MessageContent {
            content: content.to_string(),
        };
        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.auth())
            .json(&body)
            .send()
            .await?;

        Self::parse(resp, &url).await
    }

    /// Open a public thread whose starter is `message_id`.
    pub async fn start_thread_from_message(
        &self,
        channel_id: &str,
        message_id: &str,
        name: &str,
        auto_archive_duration: u32,
    ) -> Result<Channel> {
        let url = format!(
            "{}/channels/{}/messages/{}/threads",
            self.base_url, channel_id, message_id
        );
        let body = StartThread {
            name: name.to_string(),
            auto_archive_duration,
        };
        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.auth())
            .json(&body)
            .send()
            .await?;

        Self::parse(resp, &url).await
    }

    /// Fetch a channel or thread. Deleted threads return `DiscordError::NotFound`.
    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel> {
        let url = format!("{}/channels/{}", self.base_url, channel_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth())
            .send()
            .await?;

        Self::parse(resp, &url).await
    }

    pub async fn get_message(&self, channel_id: &str, message_id: &str) -> Result<Message> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        );
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth())
            .send()
            .await?;

        Self::parse(resp, &url).await
    }

    /// Replace a message's content.
    pub async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<Message> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        );
        let body = MessageContent {
            content: content.to_string(),
        };
        let resp = self
            .client
            .patch(&url)
            .header("Authorization", self.auth())
            .json(&body)
            .send()
            .await?;

        Self::parse(resp, &url).await
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response, url: &str) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(url, status = %status, "Discord request failed");
            return Err(error_for_status(status, url, &body));
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Map a non-success response to a typed error.
pub(crate) fn error_for_status(status: StatusCode, url: &str, body: &str) -> DiscordError {
    match status {
        StatusCode::NOT_FOUND => DiscordError::NotFound(url.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = serde_json::from_str::<RateLimitBody>(body)
                .map(|b| b.retry_after)
                .unwrap_or(1.0);
            DiscordError::RateLimited { retry_after }
        }
        _ => DiscordError::Api {
            status: status.as_u16(),
            message: body.to_string(),
        },
    }
}
