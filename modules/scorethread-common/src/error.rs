use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreThreadError {
    #[error("Configuration error: {0}")]
    Config(String),
}
