//! CSV text to cell grid.
//!
//! Sheet exports quote every cell and may contain line breaks inside quoted
//! cells, so splitting on newlines is not enough. Both readers here go through
//! the `csv` crate with flexible row lengths.
use std::sync::LazyLock;

use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use tracing::{debug, warn};

use super::model::Record;

/// Rows of trimmed cells, in sheet order
pub type CellGrid = Vec<Vec<String>>;

static TRAILING_EMPTY_COLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)(?:,"")+(\r?)$"#).unwrap());

/// Parse CSV text positionally: no header row, every cell trimmed.
///
/// Blank lines are skipped, including lines holding a single empty cell
/// (`""`). A record the reader cannot decode is logged and dropped rather than
/// failing the whole sheet.
pub fn parse_grid(text: &str) -> CellGrid {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    let mut skipped = 0;

    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) if is_blank(&record) => {}
            Ok(record) => grid.push(record.iter().map(str::to_string).collect()),
            Err(e) => {
                warn!("Skipping undecodable CSV row {}: {}", idx, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} undecodable rows", skipped);
    }
    debug!("Parsed cell grid with {} rows", grid.len());

    grid
}

/// Remove runs of quoted empty cells (`,""`) from the end of every line.
///
/// Exports pad each row to the sheet's full width. Without this, the header
/// row carries a tail of blank column names.
pub fn strip_trailing_empty_cols(text: &str) -> String {
    TRAILING_EMPTY_COLS.replace_all(text, "$1").into_owned()
}

/// Parse CSV text with header-row semantics.
///
/// The first row names the fields; every later row becomes a [`Record`].
/// Columns with a blank header are ignored and short rows fill the missing
/// fields with `""`. Returns the headers alongside the records.
pub fn parse_header_records(text: &str) -> (Vec<String>, Vec<Record>) {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_string).collect(),
        Err(e) => {
            warn!("Failed to read header row: {}", e);
            return (Vec::new(), Vec::new());
        }
    };

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(row) if is_blank(&row) => {}
            Ok(row) => records.push(record_from_row(&headers, &row)),
            Err(e) => warn!("Skipping undecodable CSV row {}: {}", idx + 1, e),
        }
    }

    debug!(
        "Parsed {} records under {} headers",
        records.len(),
        headers.len()
    );
    (headers, records)
}

/// A line whose only cell is empty, e.g. `""`
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn record_from_row(headers: &[String], row: &StringRecord) -> Record {
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.is_empty())
        .map(|(idx, header)| (header.as_str(), row.get(idx).unwrap_or("")))
        .collect()
}
