//! Tolerant config/data sheet parser.
//!
//! A sheet may hold a key-value config block on top, then one or more data
//! tables, each introduced by a `---` row:
//!
//! ```text
//! key,value
//! badge,New
//! ---
//! ,,Our Values          <- heading label (columns 2, 1, 0)
//! icon,title,description <- column headers
//! bi-heart,Care,We care. <- records until the next separator
//! ```
//!
//! Sheets without any separator are read as one plain header-row table.
use tracing::{debug, instrument};

use super::grid::{self, CellGrid};
use super::model::{ConfigMap, Record, SheetData, TableSection, SEPARATOR};

/// Parse one sheet's CSV export into its content model. Never fails:
/// missing rows, headers or cells degrade to empty values.
#[instrument(skip(text), fields(text_size = text.len()))]
pub fn parse_sheet(text: &str) -> SheetData {
    let raw = grid::parse_grid(text);
    let separators = separator_indices(&raw);
    debug!("Found {} separator rows", separators.len());

    if separators.is_empty() {
        // Header-based reading is the one path that sees the padded tail
        // columns as field names.
        let (_, items) = grid::parse_header_records(&grid::strip_trailing_empty_cols(text));
        debug!("No separator; parsed {} plain records", items.len());
        return SheetData::Items {
            config: ConfigMap::new(),
            items,
        };
    }

    let config = parse_config(&raw, separators[0]);

    let mut tables: Vec<TableSection> = separators
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = separators.get(n + 1).copied().unwrap_or(raw.len());
            parse_table_section(&raw, start, end)
        })
        .collect();

    debug!(
        "Parsed {} config entries and {} tables",
        config.len(),
        tables.len()
    );

    if tables.len() == 1 {
        let items = tables.pop().map(|t| t.items).unwrap_or_default();
        return SheetData::Items { config, items };
    }

    SheetData::Tables { config, tables }
}

fn separator_indices(raw: &CellGrid) -> Vec<usize> {
    raw.iter()
        .enumerate()
        .filter(|(_, row)| row.first().is_some_and(|cell| cell == SEPARATOR))
        .map(|(idx, _)| idx)
        .collect()
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> &'a str {
    candidates
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or("")
}

/// Rows `1..first_separator`, keyed through the `key`/`value` header in row 0.
fn parse_config(raw: &CellGrid, first_separator: usize) -> ConfigMap {
    let header = raw.first().map(Vec::as_slice).unwrap_or(&[]);
    let key_col = header.iter().position(|h| h == "key");
    let value_col = header.iter().position(|h| h == "value");

    let mut config = ConfigMap::new();
    for row in raw.iter().take(first_separator).skip(1) {
        let key = first_non_empty([key_col.map_or("", |c| cell(row, c)), cell(row, 0)]);
        if key.is_empty() {
            continue;
        }
        let value = first_non_empty([value_col.map_or("", |c| cell(row, c)), cell(row, 1)]);
        config.insert(key.to_string(), value.to_string());
    }
    config
}

/// Table between separator row `start` and boundary `end` (exclusive).
fn parse_table_section(raw: &CellGrid, start: usize, end: usize) -> TableSection {
    let empty = Vec::new();
    let heading_row = raw.get(start + 1).unwrap_or(&empty);
    let heading = first_non_empty([
        cell(heading_row, 2),
        cell(heading_row, 1),
        cell(heading_row, 0),
    ])
    .to_string();

    let headers = raw.get(start + 2).cloned().unwrap_or_default();

    let items = raw
        .get(start + 3..end)
        .unwrap_or(&[])
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty())
                .map(|(idx, h)| (h.as_str(), cell(row, idx)))
                .collect::<Record>()
        })
        .collect();

    TableSection {
        heading,
        headers,
        items,
    }
}
