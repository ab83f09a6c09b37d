//! Seen store: the set of message ids the user has marked as reviewed.
//!
//! Ids are always compared in string form, so `42` and `"42"` are the same
//! id. Mutations only touch memory; call [`SeenStore::persist`] to write the
//! set back to the key-value store.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

/// Key the seen set is stored under.
pub const SEEN_KEY: &str = "seen_ids";

pub struct SeenStore {
    ids: BTreeSet<String>,
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SeenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeenStore").field("ids", &self.ids).finish_non_exhaustive()
    }
}

fn key_of(id: impl Display) -> String {
    id.to_string().trim().to_string()
}

impl SeenStore {
    /// An empty set backed by `kv`. Nothing is read until [`restore`](Self::restore).
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { ids: BTreeSet::new(), kv }
    }

    /// Construct and hydrate in one step. A corrupt payload is logged and
    /// leaves the set empty.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(kv);
        if let Err(e) = store.restore() {
            tracing::warn!(error = %e, "seen set could not be restored, starting empty");
        }
        store
    }

    pub fn is_seen(&self, id: impl Display) -> bool {
        self.ids.contains(&key_of(id))
    }

    pub fn mark_seen(&mut self, id: impl Display) {
        let key = key_of(id);
        if !key.is_empty() {
            self.ids.insert(key);
        }
    }

    pub fn unmark_seen(&mut self, id: impl Display) {
        self.ids.remove(&key_of(id));
    }

    pub fn mark_many<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for id in ids {
            self.mark_seen(id);
        }
    }

    pub fn clear_all(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Seen ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Write the set as a JSON array of strings.
    pub fn persist(&self) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&self.ids)?;
        self.kv.set(SEEN_KEY, &payload)?;
        tracing::debug!(count = self.ids.len(), "seen set persisted");
        Ok(())
    }

    /// Replace the in-memory set with the stored one.
    ///
    /// A missing key is an empty set. Numeric entries written by older
    /// clients are coerced to strings.
    pub fn restore(&mut self) -> Result<(), StoreError> {
        self.ids.clear();
        let Some(payload) = self.kv.get(SEEN_KEY)? else {
            return Ok(());
        };
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&payload).map_err(|e| StoreError::Corrupt {
                key: SEEN_KEY.to_string(),
                reason: e.to_string(),
            })?;
        for value in &values {
            let id = crate::normalizer::cell(value);
            self.mark_seen(id);
        }
        tracing::debug!(count = self.ids.len(), "seen set restored");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn store() -> (Arc<MemoryStore>, SeenStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), SeenStore::new(kv))
    }

    #[test]
    fn mark_persist_restore_round_trip() {
        let (kv, mut seen) = store();
        seen.mark_seen("42");
        seen.persist().unwrap();

        let mut again = SeenStore::new(kv);
        again.restore().unwrap();
        assert!(again.is_seen("42"));
        assert!(again.is_seen(42));
    }

    #[test]
    fn numeric_and_string_ids_are_equal() {
        let (_, mut seen) = store();
        seen.mark_seen(7_u64);
        assert!(seen.is_seen("7"));
        seen.unmark_seen("7");
        assert!(!seen.is_seen(7));
    }

    #[test]
    fn mark_and_unmark_are_idempotent() {
        let (_, mut seen) = store();
        seen.mark_seen("1");
        seen.mark_seen("1");
        assert_eq!(seen.len(), 1);
        seen.unmark_seen("1");
        seen.unmark_seen("1");
        assert!(seen.is_empty());
    }

    #[test]
    fn blank_ids_are_not_recorded() {
        let (_, mut seen) = store();
        seen.mark_seen("  ");
        assert!(seen.is_empty());
    }

    #[test]
    fn restore_then_persist_keeps_membership() {
        let kv = Arc::new(MemoryStore::new().with(SEEN_KEY, r#"["3","1",2]"#));
        let mut seen = SeenStore::new(kv.clone());
        seen.restore().unwrap();
        seen.persist().unwrap();

        let stored: Vec<String> =
            serde_json::from_str(&kv.get(SEEN_KEY).unwrap().unwrap()).unwrap();
        let mut stored_sorted = stored.clone();
        stored_sorted.sort();
        assert_eq!(stored_sorted, vec!["1", "2", "3"]);
    }

    #[test]
    fn corrupt_payload_leaves_set_empty() {
        let kv = Arc::new(MemoryStore::new().with(SEEN_KEY, "not-json"));
        let mut seen = SeenStore::new(kv.clone());
        seen.mark_seen("9");
        assert!(matches!(seen.restore(), Err(StoreError::Corrupt { .. })));
        assert!(seen.is_empty());

        let opened = SeenStore::open(kv);
        assert!(opened.is_empty());
    }

    #[test]
    fn clear_all_then_persist_stores_empty_array() {
        let (kv, mut seen) = store();
        seen.mark_many(["1", "2"]);
        seen.clear_all();
        seen.persist().unwrap();
        assert_eq!(kv.get(SEEN_KEY).unwrap().as_deref(), Some("[]"));
    }
}
