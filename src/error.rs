//! Error types for the athene crate

use thiserror::Error;

/// Main error type for the athene crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state '{state}' has not been registered in the Q-table")]
    UnknownState { state: String },

    #[error("action '{action}' is not part of the configured action set")]
    UnknownAction { action: String },

    #[error("no available actions for state '{state}': every action is excluded")]
    NoAvailableAction { state: String },

    #[error("action '{action}' appears more than once in the action set")]
    DuplicateAction { action: String },

    #[error("action set must contain at least one action")]
    EmptyActionSet,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid state key '{input}': {reason}")]
    InvalidStateKey { input: String, reason: String },

    #[error("unsupported Q-table format version {found} (expected {expected})")]
    UnsupportedFormatVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error originates from reading or writing durable storage.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Io { .. }
                | Error::Serialization(_)
                | Error::SerializationContext { .. }
                | Error::Csv(_)
                | Error::UnsupportedFormatVersion { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_classification() {
        let io = Error::from(std::io::Error::other("disk full"));
        assert!(io.is_persistence());

        let unknown = Error::UnknownState {
            state: "(1, 2)".to_string(),
        };
        assert!(!unknown.is_persistence());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = Error::NoAvailableAction {
            state: "(0, 3)".to_string(),
        };
        assert!(err.to_string().contains("(0, 3)"));
    }
}
