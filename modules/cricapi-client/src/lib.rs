pub mod error;
pub mod types;

pub use error::{CricApiError, Result};
pub use types::{ApiResponse, CurrentMatch, InningScore};

use std::time::Duration;

const BASE_URL: &str = "https://api.cricapi.com/v1";

pub struct CricApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CricApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch one page of `/currentMatches`.
    pub async fn current_matches(&self, offset: u32) -> Result<Vec<CurrentMatch>> {
        let url = format!("{}/currentMatches", self.base_url);
        let offset = offset.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("offset", offset.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CricApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let text = resp.text().await?;
        let api_resp: ApiResponse<Vec<CurrentMatch>> = serde_json::from_str(&text)?;
        if api_resp.status.as_deref() == Some("failure") {
            return Err(CricApiError::Rejected(
                api_resp.reason.unwrap_or_else(|| "unknown reason".to_string()),
            ));
        }

        let matches = api_resp.data.unwrap_or_default();
        tracing::debug!(count = matches.len(), "Fetched current matches");
        Ok(matches)
    }
}
