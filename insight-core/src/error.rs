//! Error types for Insight core.

use std::{error::Error, fmt};

/// Error type for Insight core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightError {
    /// The repository list or a configuration value was rejected.
    Input(String),
    /// The repository fetch collaborator failed.
    UpstreamFetch(String),
    /// The text-generation collaborator failed.
    Generation(String),
    /// Too few result fields were populated by an otherwise successful run.
    InsufficientInsight {
        /// Number of populated result fields.
        populated: usize,
        /// Minimum number of populated fields required.
        required: usize,
    },
    /// A catch-all error with a message.
    Other(String),
}

impl InsightError {
    /// Whether the error is a rejection the caller can act on, as opposed to a
    /// failure on the serving side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Input(_) | Self::InsufficientInsight { .. })
    }
}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(message) => write!(f, "{message}"),
            Self::UpstreamFetch(message) => write!(f, "repository fetch failed: {message}"),
            Self::Generation(message) => write!(f, "text generation failed: {message}"),
            Self::InsufficientInsight {
                populated,
                required,
            } => write!(
                f,
                "Failed to generate sufficient insights ({populated} of {required} required fields)"
            ),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for InsightError {}

impl From<serde_json::Error> for InsightError {
    fn from(value: serde_json::Error) -> Self {
        Self::Other(format!("json error: {value}"))
    }
}

/// Convenience result type for Insight core.
pub type Result<T> = std::result::Result<T, InsightError>;
