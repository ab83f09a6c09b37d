use thiserror::Error;

/// Errors constructing the fetch machinery. Per-candidate failures are
/// [`scanview_core::SourceFailure`] values and never surface here.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid hosting base: {0}")]
    InvalidBase(String),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}
