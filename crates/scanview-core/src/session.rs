//! Session: the context object that owns all mutable viewer state.
//!
//! One `Session` holds the current record set, the seen store, the filter
//! state and the load-cycle bookkeeping. Independent sessions share nothing,
//! which keeps tests isolated.
//!
//! # Load cycles
//!
//! [`Session::begin_cycle`] bumps a generation counter and hands out a
//! [`CycleTicket`]. The fetch runs elsewhere; its result comes back through
//! [`Session::complete_cycle`]. A completion whose ticket is not the latest
//! generation is discarded, so a slow response can never overwrite the
//! records of a newer, faster one.

use crate::error::{LoadError, StoreError};
use crate::filter;
use crate::normalizer::normalize_all;
use crate::parse::parse_rows;
use crate::seen::SeenStore;
use crate::types::{CycleState, FilterState, Record, SeenVisibility};

/// What started a load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Timer,
    Manual,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Startup => write!(f, "startup"),
            Trigger::Timer => write!(f, "timer"),
            Trigger::Manual => write!(f, "manual"),
        }
    }
}

/// Proof of which generation a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket {
    pub generation: u64,
    pub trigger: Trigger,
}

/// Text fetched from a candidate, ready to be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub text: String,
    pub source: String,
}

/// How a completed cycle was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New records replaced the old ones.
    Rendered { source: String, records: usize },
    /// The cycle failed; previous records are left in place.
    Failed(LoadError),
    /// A newer cycle was started meanwhile; this result was dropped.
    Stale { generation: u64, latest: u64 },
}

pub struct Session {
    records: Vec<Record>,
    seen: SeenStore,
    filter: FilterState,
    visibility: SeenVisibility,
    generation: u64,
    state: CycleState,
    source: Option<String>,
    last_error: Option<LoadError>,
}

impl Session {
    pub fn new(seen: SeenStore) -> Self {
        Self {
            records: Vec::new(),
            seen,
            filter: FilterState::default(),
            visibility: SeenVisibility::default(),
            generation: 0,
            state: CycleState::Idle,
            source: None,
            last_error: None,
        }
    }

    // -- load cycles --------------------------------------------------------

    /// Enter `Loading` for a new generation.
    pub fn begin_cycle(&mut self, trigger: Trigger) -> CycleTicket {
        self.generation += 1;
        self.state = CycleState::Loading;
        tracing::debug!(generation = self.generation, %trigger, "load cycle started");
        CycleTicket { generation: self.generation, trigger }
    }

    /// Apply a fetch result, unless a newer cycle has started since `ticket`.
    pub fn complete_cycle(
        &mut self,
        ticket: CycleTicket,
        result: Result<Fetched, LoadError>,
    ) -> CycleOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale load result"
            );
            return CycleOutcome::Stale { generation: ticket.generation, latest: self.generation };
        }

        match result.and_then(|fetched| ingest(&fetched.text).map(|r| (fetched.source, r))) {
            Ok((source, records)) => {
                tracing::info!(%source, records = records.len(), "findings loaded");
                let count = records.len();
                self.records = records;
                self.source = Some(source.clone());
                self.last_error = None;
                self.state = CycleState::Rendered;
                CycleOutcome::Rendered { source, records: count }
            }
            Err(err) => {
                tracing::warn!(error = %err, "load cycle failed");
                self.last_error = Some(err.clone());
                self.state = CycleState::Failed;
                CycleOutcome::Failed(err)
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Location the current records came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    // -- derived view -------------------------------------------------------

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records after filtering, in source order.
    pub fn visible(&self) -> Vec<&Record> {
        filter::apply(&self.records, &self.filter, &self.seen, self.visibility)
    }

    pub fn keyword_options(&self) -> Vec<String> {
        filter::keyword_options(&self.records)
    }

    // -- filters ------------------------------------------------------------

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        tracing::debug!(?filter, "filter applied");
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterState::default();
    }

    pub fn visibility(&self) -> SeenVisibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: SeenVisibility) {
        self.visibility = visibility;
    }

    // -- seen tracking ------------------------------------------------------

    pub fn seen(&self) -> &SeenStore {
        &self.seen
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.is_seen(id)
    }

    /// Set one record's seen flag and persist the set.
    pub fn set_seen(&mut self, id: &str, seen: bool) -> Result<(), StoreError> {
        if seen {
            self.seen.mark_seen(id);
        } else {
            self.seen.unmark_seen(id);
        }
        self.seen.persist()
    }

    pub fn mark_all_seen<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Result<(), StoreError> {
        self.seen.mark_many(ids);
        self.seen.persist()
    }

    pub fn reset_seen(&mut self) -> Result<(), StoreError> {
        self.seen.clear_all();
        self.seen.persist()
    }
}

/// Tokenize and normalize findings text.
pub fn ingest(text: &str) -> Result<Vec<Record>, LoadError> {
    Ok(normalize_all(&parse_rows(text)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
