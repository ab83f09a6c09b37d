//! Tokenizer adapter: turns delimited findings text into untyped [`RawRow`]s.
//!
//! Tokenizing itself is delegated to the `csv` crate. This module only
//! pins down the contract the rest of the pipeline relies on: a header row
//! names the columns, blank lines are skipped, ragged rows are tolerated and
//! every cell arrives as a JSON string.

use crate::error::LoadError;
use crate::normalizer::RawRow;
use serde_json::Value;

const BOM: char = '\u{feff}';

/// Parse findings text into rows keyed by header name.
///
/// Empty or whitespace-only text yields no rows. A row shorter than the
/// header simply lacks the trailing columns; extra cells are dropped.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>, LoadError> {
    let text = text.trim_start_matches(BOM);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::Parse(format!("row {}: {e}", idx + 1)))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "parsed findings text");
    Ok(rows)
}
