//! Fetch coordinator: ordered fallback over candidate locations.
//!
//! Candidates are tried strictly in sequence, each exactly once. The first
//! success ends the walk; a failure is logged, reported and recorded, then
//! the next candidate is tried. Only when every candidate failed does the
//! load fail, carrying the last failure.

use crate::transport::Transport;
use scanview_core::error::{LoadError, SourceError};
use scanview_core::session::Fetched;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Progress notifications for the status surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchProgress {
    Trying(String),
    Failed(SourceError),
    Loaded(String),
}

/// A successful load plus whatever failed before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub fetched: Fetched,
    pub failures: Vec<SourceError>,
}

/// Strictly increasing cache-busting values, seeded from the wall clock.
#[derive(Debug, Default)]
struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    fn next(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

pub struct FetchCoordinator<T> {
    transport: T,
    buster: CacheBuster,
}

impl<T: Transport> FetchCoordinator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, buster: CacheBuster::default() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn load_from(&self, candidates: &[String]) -> Result<Loaded, LoadError> {
        self.load_from_with(candidates, |_| {}).await
    }

    /// Like [`load_from`](Self::load_from), reporting each step to `on_progress`.
    pub async fn load_from_with<F>(&self, candidates: &[String], mut on_progress: F) -> Result<Loaded, LoadError>
    where
        F: FnMut(FetchProgress) + Send,
    {
        let mut failures: Vec<SourceError> = Vec::new();

        for location in candidates {
            on_progress(FetchProgress::Trying(location.clone()));
            let ts = self.buster.next();
            match self.transport.get(location, ts).await {
                Ok(text) => {
                    tracing::info!(%location, bytes = text.len(), "candidate loaded");
                    on_progress(FetchProgress::Loaded(location.clone()));
                    return Ok(Loaded {
                        fetched: Fetched { text, source: location.clone() },
                        failures,
                    });
                }
                Err(failure) => {
                    let err = SourceError::new(location.as_str(), failure);
                    tracing::warn!(error = %err, "candidate failed");
                    on_progress(FetchProgress::Failed(err.clone()));
                    failures.push(err);
                }
            }
        }

        Err(LoadError::AllSourcesExhausted { attempts: failures.len(), last: failures.pop() })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
