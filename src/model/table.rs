//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::schema::{Column, ColumnKind};
use crate::error::{Error, Result};

/// Text layout used for timestamps, both on the wire and for display
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A cell value with type information
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Explicit "no data" marker, valid in a column of any kind
    Null,
    String(String),
    Bool(bool),
    Byte(u8),
    Int32(i32),
    Int64(i64),
    DateTime(NaiveDateTime),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Byte(a), CellValue::Byte(b)) => a == b,
            (CellValue::Int32(a), CellValue::Int32(b)) => a == b,
            (CellValue::Int64(a), CellValue::Int64(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Decimal(a), CellValue::Decimal(b)) => a == b,
            // NaN compares equal to itself so decoded tables can be compared
            (CellValue::Float(a), CellValue::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (CellValue::Double(a), CellValue::Double(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (CellValue::Bytes(a), CellValue::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Kind of the value, `None` for [`CellValue::Null`]
    pub fn kind(&self) -> Option<ColumnKind> {
        let kind = match self {
            CellValue::Null => return None,
            CellValue::String(_) => ColumnKind::String,
            CellValue::Bool(_) => ColumnKind::Boolean,
            CellValue::Byte(_) => ColumnKind::Byte,
            CellValue::Int32(_) => ColumnKind::Int32,
            CellValue::Int64(_) => ColumnKind::Int64,
            CellValue::DateTime(_) => ColumnKind::DateTime,
            CellValue::Decimal(_) => ColumnKind::Decimal,
            CellValue::Float(_) => ColumnKind::Float,
            CellValue::Double(_) => ColumnKind::Double,
            CellValue::Bytes(_) => ColumnKind::ByteArray,
        };
        Some(kind)
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Byte(b) => Cow::Owned(b.to_string()),
            CellValue::Int32(i) => Cow::Owned(i.to_string()),
            CellValue::Int64(i) => Cow::Owned(i.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format(DATETIME_FORMAT).to_string()),
            CellValue::Decimal(d) => Cow::Owned(d.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Double(f) => Cow::Owned(f.to_string()),
            CellValue::Bytes(bytes) => Cow::Owned(format!("<{} bytes>", bytes.len())),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<u8> for CellValue {
    fn from(b: u8) -> Self {
        CellValue::Byte(b)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int32(i)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int64(i)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Decimal(d)
    }
}

impl From<f32> for CellValue {
    fn from(f: f32) -> Self {
        CellValue::Float(f)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Double(f)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(bytes: Vec<u8>) -> Self {
        CellValue::Bytes(bytes)
    }
}

impl From<&[u8]> for CellValue {
    fn from(bytes: &[u8]) -> Self {
        CellValue::Bytes(bytes.to_vec())
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A named table of typed columns and rows.
///
/// Every row holds exactly one cell per column and each cell is either
/// [`CellValue::Null`] or a value of its column's kind. Columns can only be
/// added while the table has no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Table name
    pub name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create an empty table with the given columns
    pub fn with_columns<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnKind)>,
        S: Into<String>,
    {
        let mut table = Self::new(name);
        for (column, kind) in columns {
            table.add_column(column, kind)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn add_column(&mut self, name: impl Into<String>, kind: ColumnKind) -> Result<&Column> {
        let name = name.into();
        if !self.rows.is_empty() {
            return Err(Error::SchemaMismatch {
                table: self.name.clone(),
                detail: format!("cannot add column '{}' once the table has rows", name),
            });
        }
        if self.column_index(&name).is_some() {
            return Err(Error::DuplicateColumn(name));
        }

        let index = self.columns.len();
        self.columns.push(Column::new(name, index, kind));
        Ok(&self.columns[index])
    }

    /// Append a row, checking its arity and cell kinds against the columns
    pub fn add_row(&mut self, cells: Vec<CellValue>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::ArityMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }

        for (index, (cell, column)) in cells.iter().zip(&self.columns).enumerate() {
            if let Some(found) = cell.kind() {
                if found != column.kind {
                    return Err(Error::CellKindMismatch {
                        column: column.name.clone(),
                        index,
                        expected: column.kind,
                        found,
                    });
                }
            }
        }

        self.rows.push(Row { cells });
        Ok(())
    }

    /// Remove every row, keeping the columns
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Column definitions in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Declared kind of every column, in order
    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        self.columns.iter().map(|c| c.kind).collect()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::with_columns(
            "people",
            [("id", ColumnKind::Int32), ("name", ColumnKind::String)],
        )
        .unwrap()
    }

    #[test]
    fn test_add_row_checks_arity() {
        let mut table = sample();
        let err = table.add_row(vec![CellValue::Int32(1)]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_add_row_checks_kinds() {
        let mut table = sample();
        let err = table
            .add_row(vec![CellValue::Int64(1), "alice".into()])
            .unwrap_err();
        assert!(matches!(err, Error::CellKindMismatch { index: 0, .. }));

        table.add_row(vec![CellValue::Null, CellValue::Null]).unwrap();
        table.add_row(vec![7.into(), "bob".into()]).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_columns_frozen_once_rows_exist() {
        let mut table = sample();
        table.add_row(vec![1.into(), "a".into()]).unwrap();
        assert!(table.add_column("extra", ColumnKind::Boolean).is_err());

        table.clear_rows();
        assert_eq!(table.add_column("extra", ColumnKind::Boolean).unwrap().index, 2);
    }

    #[test]
    fn test_duplicate_column() {
        let mut table = sample();
        assert!(matches!(
            table.add_column("id", ColumnKind::Int64),
            Err(Error::DuplicateColumn(name)) if name == "id"
        ));
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(CellValue::Double(f64::NAN), CellValue::Double(f64::NAN));
        assert_eq!(CellValue::Float(f32::NAN), CellValue::Float(f32::NAN));
        assert_ne!(CellValue::Int32(1), CellValue::Int64(1));
    }
}
