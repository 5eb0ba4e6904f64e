use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
