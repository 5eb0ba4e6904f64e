use thiserror::Error;

pub type Result<T> = std::result::Result<T, CricApiError>;

#[derive(Debug, Error)]
pub enum CricApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CricApiError {
    fn from(err: reqwest::Error) -> Self {
        CricApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CricApiError {
    fn from(err: serde_json::Error) -> Self {
        CricApiError::Parse(err.to_string())
    }
}
