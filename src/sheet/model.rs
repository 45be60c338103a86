use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// First-cell sentinel marking a section boundary
pub const SEPARATOR: &str = "---";

/// Flat key-value settings block that precedes the first separator
pub type ConfigMap = BTreeMap<String, String>;

/// One data row keyed by column header.
///
/// Lookups never fail: a field the row doesn't carry reads as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value under the same header
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A data table found between two separators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSection {
    pub heading: String,
    /// Column headers in sheet order, blanks included
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    pub items: Vec<Record>,
}

impl TableSection {
    /// Headers that actually contribute fields to records
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| !h.is_empty())
    }

    /// Write the table back out as CSV in original header order.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let names: Vec<&str> = self.field_names().collect();
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(&names)?;
        for record in &self.items {
            writer.write_record(names.iter().map(|name| record.get(name)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Parsed form of one sheet.
///
/// Zero or one separator yields the single-table `Items` shape; two or more
/// yield `Tables`. Serializes as `{config, items}` or `{config, tables}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetData {
    Tables {
        config: ConfigMap,
        tables: Vec<TableSection>,
    },
    Items {
        config: ConfigMap,
        items: Vec<Record>,
    },
}

impl Default for SheetData {
    fn default() -> Self {
        SheetData::Items {
            config: ConfigMap::new(),
            items: Vec::new(),
        }
    }
}

impl SheetData {
    pub fn config(&self) -> &ConfigMap {
        match self {
            SheetData::Tables { config, .. } | SheetData::Items { config, .. } => config,
        }
    }

    /// Records of the single-table shape; empty for multi-table sheets
    pub fn items(&self) -> &[Record] {
        match self {
            SheetData::Items { items, .. } => items,
            SheetData::Tables { .. } => &[],
        }
    }

    /// Tables of the multi-table shape; empty for single-table sheets
    pub fn tables(&self) -> &[TableSection] {
        match self {
            SheetData::Tables { tables, .. } => tables,
            SheetData::Items { .. } => &[],
        }
    }

    /// Uniform multi-table view. A single-table sheet becomes one table with
    /// an empty heading.
    pub fn into_tables(self) -> (ConfigMap, Vec<TableSection>) {
        match self {
            SheetData::Tables { config, tables } => (config, tables),
            SheetData::Items { config, items } => (
                config,
                vec![TableSection {
                    heading: String::new(),
                    headers: Vec::new(),
                    items,
                }],
            ),
        }
    }

    /// A sheet with no separator whose rows are `key`/`value` pairs
    pub fn is_flat_key_value(&self) -> bool {
        self.config().is_empty()
            && self
                .items()
                .first()
                .is_some_and(|first| first.contains("key"))
    }
}
