//! Filter engine: derives the visible subset of records.
//!
//! Filtering is stable: the output keeps the input's relative order. All
//! criteria are conjunctive, and an unset criterion never excludes anything.
//!
//! # Date bounds
//!
//! `date_from` is compared at 00:00:00 UTC and `date_to` at the last instant
//! of that day, so picking today as the end date still shows every record from
//! today. Records whose `date_utc` cannot be parsed pass both bounds.

use crate::seen::SeenStore;
use crate::types::{FilterState, Record, SeenVisibility};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Apply `filter` and `visibility` to `records`.
pub fn apply<'a>(
    records: &'a [Record],
    filter: &FilterState,
    seen: &SeenStore,
    visibility: SeenVisibility,
) -> Vec<&'a Record> {
    let from = filter.date_from.map(start_of_day);
    let to = filter.date_to.map(end_of_day);
    let keyword = filter.keyword.trim();

    records
        .iter()
        .filter(|r| visibility == SeenVisibility::ShowAll || !seen.is_seen(&r.message_id))
        .filter(|r| keyword.is_empty() || r.has_keyword(keyword))
        .filter(|r| match r.instant() {
            None => true,
            Some(at) => from.map_or(true, |f| at >= f) && to.map_or(true, |t| at <= t),
        })
        .collect()
}

/// Sorted union of every keyword token seen in `records`.
pub fn keyword_options(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(Record::keyword_tokens)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn end_of_day(d: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999999999, ignoring leap seconds.
    d.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| d.and_time(chrono::NaiveTime::MIN))
        .and_utc()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
