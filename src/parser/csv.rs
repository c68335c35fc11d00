//! CSV file import with per-column kind inference

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::codec::cell::{parse_datetime, parse_text};
use crate::error::{Error, Result};
use crate::model::{CellValue, ColumnKind, Table};

/// Builds typed tables from CSV files
#[derive(Debug, Default)]
pub struct CsvParser {
    overrides: IndexMap<String, ColumnKind>,
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the kind of a column instead of inferring it
    pub fn with_kind(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.overrides.insert(column.into(), kind);
        self
    }

    /// Parse a CSV file into a table called `name`
    pub fn parse_path(&self, path: &Path, name: &str) -> Result<Table> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file), name)
    }

    /// Parse CSV text with a header line into a table called `name`
    pub fn parse_reader<R: Read>(&self, reader: R, name: &str) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut records: Vec<Vec<String>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let mut cells: Vec<String> = record.iter().map(|s| s.trim().to_string()).collect();
            // Pad short rows with nulls
            cells.resize(headers.len(), String::new());
            records.push(cells);
        }

        let kinds: Vec<ColumnKind> = headers
            .iter()
            .enumerate()
            .map(|(col_idx, header)| {
                self.overrides
                    .get(header)
                    .copied()
                    .unwrap_or_else(|| infer_column_kind(records.iter().map(|r| r[col_idx].as_str())))
            })
            .collect();

        let mut table = Table::with_columns(name, headers.iter().cloned().zip(kinds.iter().copied()))?;

        for (row, record) in records.iter().enumerate() {
            let mut cells = Vec::with_capacity(kinds.len());
            for (col_idx, (text, &kind)) in record.iter().zip(&kinds).enumerate() {
                if is_null_text(text) {
                    cells.push(CellValue::Null);
                    continue;
                }
                let value = parse_text(kind, text).ok_or_else(|| Error::InvalidCell {
                    row,
                    column: headers[col_idx].clone(),
                    kind,
                    found: format!("{:?}", text),
                    // header line plus 1-based record number
                    position: row + 2,
                })?;
                cells.push(value);
            }
            table.add_row(cells)?;
        }

        debug!(
            table = name,
            columns = table.column_count(),
            rows = table.row_count(),
            "parsed CSV"
        );
        Ok(table)
    }
}

fn is_null_text(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("null") || s == "NA"
}

/// Guess the narrowest kind for one textual cell
fn guess_kind(s: &str) -> Option<ColumnKind> {
    if is_null_text(s) {
        return None;
    }

    let kind = if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        ColumnKind::Boolean
    } else if s.parse::<i32>().is_ok() {
        ColumnKind::Int32
    } else if s.parse::<i64>().is_ok() {
        ColumnKind::Int64
    } else if s.parse::<f64>().is_ok_and(f64::is_finite) {
        ColumnKind::Double
    } else if parse_datetime(s).is_some() {
        ColumnKind::DateTime
    } else {
        ColumnKind::String
    };
    Some(kind)
}

/// Infer a column kind from its cells; all-null columns are text
fn infer_column_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    cells
        .filter_map(guess_kind)
        .reduce(ColumnKind::widen)
        .unwrap_or(ColumnKind::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_kind() {
        assert_eq!(guess_kind(""), None);
        assert_eq!(guess_kind("null"), None);
        assert_eq!(guess_kind("TRUE"), Some(ColumnKind::Boolean));
        assert_eq!(guess_kind("42"), Some(ColumnKind::Int32));
        assert_eq!(guess_kind("4294967296"), Some(ColumnKind::Int64));
        assert_eq!(guess_kind("3.14"), Some(ColumnKind::Double));
        assert_eq!(guess_kind("inf"), Some(ColumnKind::String));
        assert_eq!(guess_kind("2024-01-15"), Some(ColumnKind::DateTime));
        assert_eq!(guess_kind("hello"), Some(ColumnKind::String));
    }

    #[test]
    fn test_parse_infers_and_converts() {
        let csv = "id,name,score,active\n1,alpha,2.5,true\n2,beta,,false\n3,gamma,4,\n";
        let table = CsvParser::new().parse_reader(csv.as_bytes(), "scores").unwrap();

        assert_eq!(
            table.column_kinds(),
            [ColumnKind::Int32, ColumnKind::String, ColumnKind::Double, ColumnKind::Boolean]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1].get(2), Some(&CellValue::Null));
        // integer text in a double column becomes a double
        assert_eq!(table.rows()[2].get(2), Some(&CellValue::Double(4.0)));
    }

    #[test]
    fn test_override_kind() {
        let csv = "code\n007\n";
        let table = CsvParser::new()
            .with_kind("code", ColumnKind::String)
            .parse_reader(csv.as_bytes(), "codes")
            .unwrap();
        assert_eq!(table.rows()[0].get(0), Some(&CellValue::String("007".into())));

        let err = CsvParser::new()
            .with_kind("code", ColumnKind::Boolean)
            .parse_reader(csv.as_bytes(), "codes")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCell { position: 2, .. }));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "a,b\n1\n";
        let table = CsvParser::new().parse_reader(csv.as_bytes(), "t").unwrap();
        assert_eq!(table.rows()[0].cells, vec![CellValue::Int32(1), CellValue::Null]);
    }
}
