//! Normalizer: maps raw tokenizer rows into canonical [`Record`](crate::Record) values.
//!
//! This is the only place the canonical shape is imposed. It never fails:
//! missing or null columns become empty strings, unknown columns are ignored.

use crate::types::Record;
use serde_json::Value;
use std::collections::HashMap;

/// An untyped row as produced by the tokenizer: column name to cell value.
pub type RawRow = HashMap<String, Value>;

/// Column written by the first schema revision before it was renamed to `keywords`.
const V1_KEYWORD_COLUMN: &str = "keyword";

/// Build a [`Record`] from any row shape.
pub fn normalize(row: &RawRow) -> Record {
    let keywords = match row.get("keywords") {
        Some(v) if !v.is_null() => cell(v),
        _ => column(row, V1_KEYWORD_COLUMN),
    };

    Record {
        date_utc: column(row, "date_utc"),
        message_id: column(row, "message_id").trim().to_string(),
        url: column(row, "url"),
        keywords,
        snippet: column(row, "snippet"),
        udemy_urls: column(row, "udemy_urls"),
        coupon_codes: column(row, "coupon_codes"),
    }
}

/// Normalize every row, preserving order.
pub fn normalize_all(rows: &[RawRow]) -> Vec<Record> {
    rows.iter().map(normalize).collect()
}

fn column(row: &RawRow, name: &str) -> String {
    row.get(name).map(cell).unwrap_or_default()
}

/// String form of a cell. Numbers keep their display form so an id written
/// as `42` and one written as `"42"` end up identical.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn narrow_schema_maps_fields() {
        let r = normalize(&row(&[
            ("date_utc", json!("2024-01-01")),
            ("message_id", json!("1")),
            ("url", json!("http://a")),
            ("keywords", json!("x|y")),
            ("snippet", json!("hello")),
        ]));
        assert_eq!(r.date_utc, "2024-01-01");
        assert_eq!(r.message_id, "1");
        assert_eq!(r.keywords, "x|y");
        assert_eq!(r.udemy_urls, "");
        assert_eq!(r.coupon_codes, "");
    }

    #[test]
    fn wide_schema_keeps_legacy_lists() {
        let r = normalize(&row(&[
            ("message_id", json!("7")),
            ("udemy_urls", json!("https://www.udemy.com/course/x/?couponCode=ABC")),
            ("coupon_codes", json!("ABC")),
        ]));
        assert_eq!(r.coupon_code_list(), vec!["ABC"]);
        assert_eq!(r.snippet, "");
    }

    #[test]
    fn empty_row_yields_all_empty_fields() {
        assert_eq!(normalize(&RawRow::new()), Record::default());
    }

    #[test]
    fn null_and_numeric_cells_are_coerced() {
        let r = normalize(&row(&[
            ("message_id", json!(231689)),
            ("url", Value::Null),
            ("snippet", json!(true)),
        ]));
        assert_eq!(r.message_id, "231689");
        assert_eq!(r.url, "");
        assert_eq!(r.snippet, "true");
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let r = normalize(&row(&[("message_id", json!("3")), ("channel", json!("x"))]));
        assert_eq!(r, Record { message_id: "3".into(), ..Default::default() });
    }

    #[test]
    fn v1_keyword_column_is_read_when_keywords_missing() {
        let r = normalize(&row(&[("keyword", json!("CCNA"))]));
        assert_eq!(r.keywords, "CCNA");

        let both = normalize(&row(&[("keyword", json!("old")), ("keywords", json!("new"))]));
        assert_eq!(both.keywords, "new");
    }

    const KNOWN: &[&str] = &[
        "date_utc",
        "message_id",
        "url",
        "keywords",
        "snippet",
        "udemy_urls",
        "coupon_codes",
        "keyword",
    ];

    proptest! {
        #[test]
        fn normalize_is_total(
            mask in proptest::collection::vec(any::<bool>(), KNOWN.len()),
            values in proptest::collection::vec(".*", KNOWN.len()),
        ) {
            let row: RawRow = KNOWN
                .iter()
                .zip(mask.iter().zip(values.iter()))
                .filter(|(_, (keep, _))| **keep)
                .map(|(k, (_, v))| (k.to_string(), Value::String(v.clone())))
                .collect();
            let r = normalize(&row);
            for col in crate::types::BASE_COLUMNS {
                if !row.contains_key(col) && !(col == "keywords" && row.contains_key("keyword")) {
                    prop_assert_eq!(r.field(col), "");
                }
            }
        }
    }
}
