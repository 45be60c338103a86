// Sheet module
//
// Turns one tab's CSV export into structured content:
// - grid: quote-aware CSV reading into trimmed cells
// - model: config map, records, tables and the parsed sheet shape
// - parser: separator-driven config/table extraction

pub mod grid;
pub mod model;
pub mod parser;

pub use model::{ConfigMap, Record, SheetData, TableSection, SEPARATOR};
pub use parser::parse_sheet;
