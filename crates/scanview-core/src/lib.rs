//! scanview-core: findings viewer core library.
//!
//! Everything here is synchronous and I/O-free apart from the file-backed
//! key-value store. Fetching lives in `scanview-feeds`, drawing in
//! `scanview-tui`.
//!
//! # Pipeline
//!
//! ```text
//! resolver ──► (fetch) ──► parse ──► normalizer ──► Session ──► filter ──► view
//!                                                     │
//!                                                   seen ◄──► kv
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod kv;
pub mod normalizer;
pub mod parse;
pub mod prefs;
pub mod resolver;
pub mod seen;
pub mod session;
pub mod types;
pub mod view;

pub use error::{LoadError, SourceError, SourceFailure, StoreError};
pub use session::{CycleOutcome, CycleTicket, Fetched, Session, Trigger};
pub use types::{CycleState, FilterState, Record, SeenVisibility};
