//! Error types shared across the pipeline.

use thiserror::Error;

/// Why a single candidate source could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceFailure {
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),
    /// Connection, TLS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// A local file candidate could not be read.
    #[error("I/O error: {0}")]
    Io(String),
    /// The location could not be turned into a URL or path.
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// A failed attempt against one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {failure}")]
pub struct SourceError {
    pub location: String,
    pub failure: SourceFailure,
}

impl SourceError {
    pub fn new(location: impl Into<String>, failure: SourceFailure) -> Self {
        Self { location: location.into(), failure }
    }
}

/// A load cycle ended without new records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Every candidate was tried once and none answered successfully.
    #[error("all {attempts} candidate source(s) failed{}", last_suffix(.last))]
    AllSourcesExhausted {
        attempts: usize,
        last: Option<SourceError>,
    },
    /// The fetched text could not be tokenized.
    #[error("could not parse findings: {0}")]
    Parse(String),
}

fn last_suffix(last: &Option<SourceError>) -> String {
    match last {
        Some(err) => format!(" (last error: {err})"),
        None => String::new(),
    }
}

/// Persisted key-value store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value for {key:?} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rejected user input in the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterInputError {
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    BadDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_carries_last_error() {
        let err = LoadError::AllSourcesExhausted {
            attempts: 3,
            last: Some(SourceError::new("good", SourceFailure::Status(404))),
        };
        let msg = err.to_string();
        assert!(msg.contains("all 3 candidate"), "{msg}");
        assert!(msg.contains("good: HTTP 404"), "{msg}");
    }

    #[test]
    fn exhausted_without_candidates() {
        let err = LoadError::AllSourcesExhausted { attempts: 0, last: None };
        assert_eq!(err.to_string(), "all 0 candidate source(s) failed");
    }
}
