//! Markdown table list parsing
//!
//! The table list is the authoritative catalogue: a pipe table whose header
//! row carries an ID column marker, followed by one row per table.

use std::path::Path;

use tableaudit_core::{SchemaError, TableCategory, TableSchema};

use crate::error::ParseError;

/// Header cells that identify the catalogue table
const ID_MARKERS: [&str; 4] = ["テーブルID", "Table ID", "TableID", "ID"];

/// One catalogue row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableListEntry {
    /// Catalogue identifier, e.g. `TBL-001`
    pub table_id: String,
    pub category: Option<TableCategory>,
    pub table_name: String,
    pub logical_name: Option<String>,
}

impl TableListEntry {
    /// A column-less schema carrying the catalogue's name and category
    pub fn to_schema(&self) -> Result<TableSchema, SchemaError> {
        let mut schema = TableSchema::new(&self.table_name)?;
        schema.logical_name = self.logical_name.clone();
        if self.category.is_some() {
            schema.category = self.category;
        }
        Ok(schema)
    }
}

/// Parser for the markdown table list
pub struct TableListParser;

impl TableListParser {
    pub fn parse_file(path: &Path) -> Result<Vec<TableListEntry>, ParseError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ParseError::IoError(path.display().to_string(), e.to_string()))?;
        Ok(Self::parse(&text))
    }

    /// Entries in document order; rows with an empty table name are skipped
    pub fn parse(text: &str) -> Vec<TableListEntry> {
        let mut entries = Vec::new();
        let mut in_table = false;

        for line in text.lines() {
            let line = line.trim();

            if line.starts_with("# ") && in_table {
                break;
            }

            if !line.starts_with('|') {
                continue;
            }

            let cells = split_row(line);

            if is_header(&cells) {
                in_table = true;
                continue;
            }
            if !in_table || is_separator(&cells) {
                continue;
            }

            match entry_from_cells(&cells) {
                Some(entry) => entries.push(entry),
                None => tracing::debug!(row = line, "skipping table list row without a table name"),
            }
        }

        entries
    }
}

fn split_row(line: &str) -> Vec<&str> {
    let inner = line.trim_matches('|');
    inner.split('|').map(str::trim).collect()
}

fn is_header(cells: &[&str]) -> bool {
    cells
        .first()
        .map(|first| ID_MARKERS.iter().any(|marker| first.eq_ignore_ascii_case(marker)))
        .unwrap_or(false)
}

fn is_separator(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}

/// `| id | category | table_name | logical_name | ... |`
fn entry_from_cells(cells: &[&str]) -> Option<TableListEntry> {
    let table_id = cells.first()?.to_string();
    let category = cells.get(1).and_then(|c| TableCategory::parse(c));
    let table_name = cells.get(2).map(|c| strip_markup(c)).filter(|c| !c.is_empty())?;
    let logical_name = cells.get(3).map(|c| strip_markup(c)).filter(|c| !c.is_empty());

    Some(TableListEntry {
        table_id,
        category,
        table_name,
        logical_name,
    })
}

/// `[MST_Foo](./MST_Foo.md)` → `MST_Foo`, `` `MST_Foo` `` → `MST_Foo`
fn strip_markup(cell: &str) -> String {
    let cell = cell.trim();
    let cell = match (cell.find('['), cell.find("](")) {
        (Some(open), Some(close)) if open < close => &cell[open + 1..close],
        _ => cell,
    };
    cell.trim_matches(|c| matches!(c, '`' | '*')).trim().to_string()
}
