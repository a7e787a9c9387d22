use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    /// Caller contract violation, e.g. no keywords
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
