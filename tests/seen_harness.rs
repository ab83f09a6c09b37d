#![allow(unused)]
//! Seen-tracking persistence harness.
//!
//! # What this covers
//!
//! - **Round trip through the file store**: marks written in one session are
//!   visible after the store file is reopened.
//! - **Id coercion**: numeric ids and their string form are the same id,
//!   including numeric entries written by older clients.
//! - **Corrupt payloads** leave the set empty instead of failing the session.
//! - **Theme preference** shares the same file without clobbering seen marks.
//!
//! # What this does NOT cover
//!
//! - Concurrent writers to one store file (single-process viewer)
//!
//! # Running
//!
//! ```sh
//! cargo test --test seen_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use scanview::core::kv::{JsonFileStore, KeyValueStore};
use scanview::core::prefs::ThemePreference;
use scanview::core::seen::SeenStore;
use scanview::core::session::Fetched;
use scanview::core::{SeenVisibility, Trigger};
use std::sync::Arc;

fn file_store(path: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::open(path).unwrap())
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn marks_survive_reopening_the_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut seen = SeenStore::open(file_store(&path));
    seen.mark_seen("42");
    seen.mark_seen(7);
    seen.persist().unwrap();
    drop(seen);

    let reopened = SeenStore::open(file_store(&path));
    assert!(reopened.is_seen("42"));
    assert!(reopened.is_seen(42));
    assert!(reopened.is_seen("7"));
    assert_eq!(reopened.len(), 2);
}

#[test]
fn session_toggles_persist_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut session = session_over(file_store(&path));
    let ticket = session.begin_cycle(Trigger::Startup);
    session.complete_cycle(ticket, Ok(Fetched { text: NARROW_CSV.into(), source: "t".into() }));
    session.set_seen("1", true).unwrap();
    session.mark_all_seen(["2"]).unwrap();
    session.set_seen("1", false).unwrap();

    let reopened = session_over(file_store(&path));
    assert!(!reopened.is_seen("1"));
    assert!(reopened.is_seen("2"));
}

#[test]
fn reset_clears_the_persisted_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut session = session_over(file_store(&path));
    session.mark_all_seen(["1", "2", "3"]).unwrap();
    session.reset_seen().unwrap();

    let reopened = SeenStore::open(file_store(&path));
    assert!(reopened.is_empty());
}

#[test]
fn hide_seen_uses_restored_marks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"seen_ids":"[1, \"2\"]"}"#).unwrap();

    let mut session = session_over(file_store(&path));
    let ticket = session.begin_cycle(Trigger::Startup);
    session.complete_cycle(ticket, Ok(Fetched { text: NARROW_CSV.into(), source: "t".into() }));
    session.set_visibility(SeenVisibility::HideSeen);

    assert!(session.visible().is_empty());
}

// ---------------------------------------------------------------------------
// Damaged storage
// ---------------------------------------------------------------------------

#[test]
fn corrupt_seen_payload_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"seen_ids":"not json"}"#).unwrap();

    let seen = SeenStore::open(file_store(&path));
    assert!(seen.is_empty());
}

#[test]
fn theme_and_seen_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let kv = file_store(&path);

    let mut seen = SeenStore::open(kv.clone());
    seen.mark_seen("9");
    seen.persist().unwrap();
    ThemePreference::Light.save(kv.as_ref()).unwrap();

    let kv = file_store(&path);
    assert_eq!(ThemePreference::load(kv.as_ref()), ThemePreference::Light);
    assert!(SeenStore::open(kv).is_seen("9"));
}
