//! scanview: terminal viewer for scan findings.
//!
//! Findings are published as a CSV file that may live in several places.
//! scanview tries each candidate location in order, normalizes whichever
//! copy it gets, and shows it as a paginated table with persistent "seen"
//! marks and keyword / date filters.
//!
//! # Architecture
//!
//! ```text
//! resolver ──► fetch ──► parse/normalize ──► Session ──► filter ──► view ──► TUI
//!                                               ▲                    │
//!                                               └──── seen toggles ◄─┘
//! ```
//!
//! The library crates are re-exported so integration tests and benches can
//! reach every layer through this one crate.

pub mod headless;

pub use scanview_core as core;
pub use scanview_feeds as feeds;
pub use scanview_tui as tui;
