//! Core types for scanview-core.
//!
//! This module defines the data structures shared across all pipeline layers:
//! the canonical [`Record`], the user-facing [`FilterState`], the
//! [`SeenVisibility`] switch and the per-cycle [`CycleState`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Column names of the canonical (narrow) schema, in display order.
pub const BASE_COLUMNS: [&str; 5] = ["date_utc", "message_id", "url", "keywords", "snippet"];

/// Extra columns emitted by the older, wide schema.
pub const LEGACY_COLUMNS: [&str; 2] = ["udemy_urls", "coupon_codes"];

/// One scan finding in its canonical shape.
///
/// Every field is a plain string. Columns that were absent from the source
/// row are empty, never missing, so downstream code works unchanged whether
/// the feed used the narrow or the wide schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Timestamp as written by the scanner. May be empty or unparsable.
    pub date_utc: String,
    /// Identifier of the source message, always in string form.
    pub message_id: String,
    /// Link back to the original post. May be empty.
    pub url: String,
    /// `|`-delimited keyword tokens.
    pub keywords: String,
    /// Free text excerpt.
    pub snippet: String,
    /// `;`-delimited course links (wide schema only).
    pub udemy_urls: String,
    /// `;`-delimited coupon codes (wide schema only).
    pub coupon_codes: String,
}

impl Record {
    /// Keyword tokens, trimmed, with empty tokens dropped.
    pub fn keyword_tokens(&self) -> impl Iterator<Item = &str> {
        split_list(&self.keywords, '|')
    }

    /// Whether the keyword list contains `token` exactly (case-sensitive).
    pub fn has_keyword(&self, token: &str) -> bool {
        self.keyword_tokens().any(|k| k == token)
    }

    pub fn udemy_url_list(&self) -> Vec<&str> {
        split_list(&self.udemy_urls, ';').collect()
    }

    pub fn coupon_code_list(&self) -> Vec<&str> {
        split_list(&self.coupon_codes, ';').collect()
    }

    /// Best-effort parse of `date_utc` into an instant.
    ///
    /// Returns `None` for empty or unrecognised timestamps; callers treat that
    /// as "no date" rather than as an error.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.date_utc)
    }

    /// Canonical field value by column name. Unknown names yield `""`.
    pub fn field(&self, column: &str) -> &str {
        match column {
            "date_utc" => &self.date_utc,
            "message_id" => &self.message_id,
            "url" => &self.url,
            "keywords" => &self.keywords,
            "snippet" => &self.snippet,
            "udemy_urls" => &self.udemy_urls,
            "coupon_codes" => &self.coupon_codes,
            _ => "",
        }
    }
}

fn split_list(s: &str, sep: char) -> impl Iterator<Item = &str> {
    s.split(sep).map(str::trim).filter(|t| !t.is_empty())
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a scanner timestamp.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and bare dates
/// (start of day UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Session-local filter criteria. An empty criterion means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Exact keyword token to require, or empty.
    pub keyword: String,
    /// Inclusive lower bound, compared at 00:00:00 UTC.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound, compared at 23:59:59 UTC.
    pub date_to: Option<NaiveDate>,
}

impl FilterState {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Parse a date input field. Blank input clears the bound.
    pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, crate::error::FilterInputError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| crate::error::FilterInputError::BadDate(input.to_string()))
    }
}

/// Whether records already marked as seen stay in the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeenVisibility {
    #[default]
    ShowAll,
    HideSeen,
}

impl SeenVisibility {
    pub fn toggled(self) -> Self {
        match self {
            SeenVisibility::ShowAll => SeenVisibility::HideSeen,
            SeenVisibility::HideSeen => SeenVisibility::ShowAll,
        }
    }
}

/// Where the current load cycle stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleState {
    #[default]
    Idle,
    Loading,
    Rendered,
    Failed,
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleState::Idle => write!(f, "idle"),
            CycleState::Loading => write!(f, "loading"),
            CycleState::Rendered => write!(f, "rendered"),
            CycleState::Failed => write!(f, "failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
