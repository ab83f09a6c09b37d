//! Test builders: ergonomic constructors for `Record`, sessions and stores.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use scanview::core::kv::{KeyValueStore, MemoryStore};
use scanview::core::seen::{SeenStore, SEEN_KEY};
use scanview::core::{Record, Session};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("42")
///     .date("2024-03-01T23:00:00Z")
///     .keywords("rust|tokio")
///     .build();
/// ```
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(message_id: impl Into<String>) -> Self {
        let message_id = message_id.into();
        Self {
            record: Record {
                url: format!("https://t.me/channel/{message_id}"),
                snippet: format!("finding {message_id}"),
                message_id,
                ..Record::default()
            },
        }
    }

    pub fn date(mut self, date_utc: impl Into<String>) -> Self {
        self.record.date_utc = date_utc.into();
        self
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.record.keywords = keywords.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.record.url = url.into();
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.record.snippet = snippet.into();
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Stores and sessions
// ---------------------------------------------------------------------------

/// An in-memory store pre-seeded with `ids` as the persisted seen set.
pub fn store_with_seen(ids: &[&str]) -> Arc<MemoryStore> {
    let payload = serde_json::to_string(ids).unwrap();
    Arc::new(MemoryStore::new().with(SEEN_KEY, &payload))
}

/// A fresh session over `kv`, hydrating the seen set from it.
pub fn session_over(kv: Arc<dyn KeyValueStore>) -> Session {
    Session::new(SeenStore::open(kv))
}

/// Message ids of `records`, in order.
pub fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|r| r.message_id.clone()).collect()
}
