use thiserror::Error;

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors that can occur while loading a roster snapshot
#[derive(Error, Debug)]
pub enum RosterError {
    /// The remote roster could not be fetched (transport error or non-2xx)
    #[error("Roster upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A column the scorer depends on is absent from the header
    #[error("Roster is missing required column '{0}'")]
    MissingColumn(String),

    /// A counter cell could not be read as a non-negative integer
    #[error("Invalid value '{value}' in column '{column}' (row {row})")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    /// Create an upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }
}
