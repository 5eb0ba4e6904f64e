use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscordError>;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: f64 },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DiscordError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiscordError::NotFound(_))
    }
}

impl From<reqwest::Error> for DiscordError {
    fn from(err: reqwest::Error) -> Self {
        DiscordError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DiscordError {
    fn from(err: serde_json::Error) -> Self {
        DiscordError::Parse(err.to_string())
    }
}
