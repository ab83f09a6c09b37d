#![allow(unused)]
//! End-to-end pipeline harness.
//!
//! # What this covers
//!
//! - **Fallback then render**: candidates are walked in order against a real
//!   HTTP host, the first good one is ingested, the seen set is applied and
//!   the filtered rows reach a table surface.
//! - **Seen visibility and keyword filter** over the loaded records.
//! - **Stale completion**: a slow cycle finishing after a newer one must not
//!   overwrite the newer records.
//! - **Failure after success**: a failed reload keeps the rendered table.
//!
//! # What this does NOT cover
//!
//! - Terminal drawing (see the `scanview-tui` unit tests)
//! - Timer-driven reloads (see `scanview-feeds` scheduler tests)
//!
//! # Running
//!
//! ```sh
//! cargo test --test pipeline_harness
//! ```

mod common;
use common::fake_host::FakeHost;
use common::*;

use pretty_assertions::assert_eq;
use scanview::core::config::HttpConfig;
use scanview::core::view::{SurfaceMessage, SurfaceOptions, ViewBinder};
use scanview::core::{CycleOutcome, CycleState, FilterState, LoadError, SeenVisibility, Trigger};
use scanview::feeds::{FetchCoordinator, HostingBase, HttpTransport};
use scanview::tui::surface::TableSurface;
use scanview::tui::widgets::status_bar::{StatusKind, StatusLine};

async fn coordinator(host: &FakeHost) -> FetchCoordinator<HttpTransport> {
    let base = HostingBase::parse(&host.base_url()).unwrap();
    FetchCoordinator::new(HttpTransport::new(base, &HttpConfig::default()).unwrap())
}

fn candidates(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Fallback then render
// ---------------------------------------------------------------------------

/// bad1 and bad2 fail, good is used; two records; hide-seen leaves only "1";
/// keyword `y` with show-all keeps both.
#[tokio::test]
async fn falls_back_to_good_source_and_applies_seen_and_filters() {
    let host = FakeHost::start().await.unwrap();
    host.serve("/bad1", 503, "").await;
    host.serve("/good", 200, NARROW_CSV).await;
    let fetcher = coordinator(&host).await;

    let mut session = session_over(store_with_seen(&["2"]));
    let ticket = session.begin_cycle(Trigger::Startup);
    let loaded = fetcher.load_from(&candidates(&["bad1", "bad2", "good"])).await.unwrap();

    assert_eq!(loaded.failures.len(), 2);
    assert_eq!(loaded.fetched.source, "good");
    let paths: Vec<String> = host.requests().await.into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/bad1", "/bad2", "/good"]);

    let outcome = session.complete_cycle(ticket, Ok(loaded.fetched));
    assert_eq!(outcome, CycleOutcome::Rendered { source: "good".into(), records: 2 });
    assert_eq!(session.records().len(), 2);

    session.set_visibility(SeenVisibility::HideSeen);
    assert_eq!(ids(session.visible()), vec!["1"]);

    session.set_visibility(SeenVisibility::ShowAll);
    session.set_filter(FilterState { keyword: "y".into(), ..FilterState::default() });
    assert_eq!(ids(session.visible()), vec!["1", "2"]);
}

#[tokio::test]
async fn rendered_cycle_reaches_surface_and_status_line() {
    let host = FakeHost::start().await.unwrap();
    host.serve("/findings.csv", 200, WIDE_CSV).await;
    let fetcher = coordinator(&host).await;

    let status = StatusLine::default();
    let mut view = ViewBinder::new(
        Some(TableSurface::new()),
        Some(Box::new(status.clone())),
        SurfaceOptions::default(),
    );
    let mut session = session_over(store_with_seen(&["102"]));

    let ticket = session.begin_cycle(Trigger::Startup);
    view.loading();
    assert_eq!(view.surface().unwrap().message(), Some(&SurfaceMessage::Loading));

    let result = fetcher
        .load_from(&candidates(&["findings.csv"]))
        .await
        .map(|l| l.fetched);
    let outcome = session.complete_cycle(ticket, result);
    view.cycle_finished(&session, &outcome);

    let surface = view.surface().unwrap();
    assert_eq!(surface.row_count(), 2);
    let seen: Vec<bool> = surface.page_rows().iter().map(|r| r.seen).collect();
    assert_eq!(seen, vec![false, true]);
    assert_eq!(status.get().kind, StatusKind::Ok);
    assert!(status.get().text.starts_with("Loaded from: findings.csv"));
}

// ---------------------------------------------------------------------------
// Exhaustion and failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_candidate_failing_reports_the_last_error() {
    let host = FakeHost::start().await.unwrap();
    host.serve("/a", 500, "").await;
    host.serve("/b", 403, "").await;
    let fetcher = coordinator(&host).await;

    let err = fetcher.load_from(&candidates(&["a", "b"])).await.unwrap_err();
    match err {
        LoadError::AllSourcesExhausted { attempts, last: Some(last) } => {
            assert_eq!(attempts, 2);
            assert_eq!(last.location, "b");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(host.requests().await.len(), 2);
}

#[tokio::test]
async fn failed_reload_keeps_rendered_table() {
    let host = FakeHost::start().await.unwrap();
    host.serve("/findings.csv", 200, NARROW_CSV).await;
    let fetcher = coordinator(&host).await;
    let list = candidates(&["findings.csv"]);

    let status = StatusLine::default();
    let mut view = ViewBinder::new(
        Some(TableSurface::new()),
        Some(Box::new(status.clone())),
        SurfaceOptions::default(),
    );
    let mut session = session_over(store_with_seen(&[]));

    let ticket = session.begin_cycle(Trigger::Startup);
    let outcome = session.complete_cycle(ticket, fetcher.load_from(&list).await.map(|l| l.fetched));
    view.cycle_finished(&session, &outcome);

    host.serve("/findings.csv", 502, "").await;
    let ticket = session.begin_cycle(Trigger::Manual);
    view.loading();
    let outcome = session.complete_cycle(ticket, fetcher.load_from(&list).await.map(|l| l.fetched));
    view.cycle_finished(&session, &outcome);

    assert_eq!(session.state(), CycleState::Failed);
    assert_eq!(session.records().len(), 2);
    assert_eq!(view.surface().unwrap().row_count(), 2);
    assert_eq!(status.get().kind, StatusKind::Error);
    assert!(status.get().text.contains("HTTP 502"), "{}", status.get().text);
}

// ---------------------------------------------------------------------------
// Stale completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_cycle_finishing_late_is_discarded() {
    let host = FakeHost::start().await.unwrap();
    host.serve("/old.csv", 200, V1_CSV).await;
    host.serve("/new.csv", 200, NARROW_CSV).await;
    let fetcher = coordinator(&host).await;

    let mut session = session_over(store_with_seen(&[]));
    let slow = session.begin_cycle(Trigger::Timer);
    let fast = session.begin_cycle(Trigger::Manual);

    let fresh = fetcher.load_from(&candidates(&["new.csv"])).await.map(|l| l.fetched);
    session.complete_cycle(fast, fresh);
    let late = fetcher.load_from(&candidates(&["old.csv"])).await.map(|l| l.fetched);
    let outcome = session.complete_cycle(slow, late);

    assert_eq!(outcome, CycleOutcome::Stale { generation: slow.generation, latest: fast.generation });
    assert_eq!(ids(session.records()), vec!["1", "2"]);
    assert_eq!(session.source(), Some("new.csv"));
}
