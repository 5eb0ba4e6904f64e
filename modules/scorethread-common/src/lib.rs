pub mod config;
pub mod error;

pub use config::{Config, QuietWindow, SourceKind};
pub use error::ScoreThreadError;
