//! Compact encoding of a single table.
//!
//! A table is written as one array whose first element is a header object
//! mapping each column name to its type tag, followed by one array per row:
//!
//! ```text
//! [{"id":3,"name":0},[1,"alpha"],[2,null]]
//! ```
//!
//! Rows are positional; column names appear only in the header.

use tracing::{debug, trace};

use super::cell;
use crate::error::{Error, Result};
use crate::model::{CellValue, ColumnKind, Table};
use crate::token::{describe, Token, TokenReader, TokenWriter};

/// Write `table` in compact form
pub fn write_table<W: TokenWriter + ?Sized>(writer: &mut W, table: &Table) -> Result<()> {
    writer.start_array()?;

    writer.start_object()?;
    for column in table.columns() {
        writer.property_name(&column.name)?;
        writer.write_i64(column.kind.code())?;
    }
    writer.end_object()?;

    for row in table.rows() {
        writer.start_array()?;
        for value in &row.cells {
            cell::write_cell(writer, value)?;
        }
        writer.end_array()?;
    }

    writer.end_array()?;

    debug!(
        table = %table.name,
        columns = table.column_count(),
        rows = table.row_count(),
        "encoded table"
    );
    Ok(())
}

/// Read a compact table starting at the reader's current token.
///
/// Returns `None` for a `null` token. When `target` is given it is filled
/// instead of a fresh table: its name is kept, its rows are replaced, and if
/// it already has columns the header must match them exactly.
///
/// On success the reader rests on the table's last token.
pub fn read_table<R: TokenReader + ?Sized>(
    reader: &mut R,
    target: Option<Table>,
) -> Result<Option<Table>> {
    match reader.current() {
        Some(Token::Null) => return Ok(None),
        Some(Token::StartArray) => {}
        other => return Err(malformed("StartArray", other, reader.position())),
    }

    let mut table = target.unwrap_or_default();
    table.clear_rows();

    reader.read()?;
    if !matches!(reader.current(), Some(Token::StartObject)) {
        return Err(malformed("StartObject", reader.current(), reader.position()));
    }
    let kinds = read_header(reader, &mut table)?;

    reader.read()?;
    let mut row = 0;
    while matches!(reader.current(), Some(Token::StartArray)) {
        let cells = read_row(reader, &table, &kinds, row)?;
        table.add_row(cells)?;
        row += 1;
        reader.read()?;
    }

    if !matches!(reader.current(), Some(Token::EndArray)) {
        return Err(malformed("StartArray or EndArray", reader.current(), reader.position()));
    }

    debug!(
        table = %table.name,
        columns = table.column_count(),
        rows = table.row_count(),
        "decoded table"
    );
    Ok(Some(table))
}

/// Consume the header object, leaving the reader on its `EndObject`
fn read_header<R: TokenReader + ?Sized>(reader: &mut R, table: &mut Table) -> Result<Vec<ColumnKind>> {
    let expected = table.column_count();
    let mut kinds = Vec::with_capacity(expected);

    reader.read()?;
    loop {
        let name = match reader.current() {
            Some(Token::PropertyName(name)) => name.clone(),
            Some(Token::EndObject) => break,
            other => return Err(malformed("PropertyName or EndObject", other, reader.position())),
        };

        let index = kinds.len();
        if table.columns()[..index.min(table.column_count())]
            .iter()
            .any(|c| c.name == name)
        {
            return Err(Error::DuplicateColumn(name));
        }

        reader.read()?;
        let kind = read_type_tag(reader, &name)?;

        if expected == 0 {
            table.add_column(name.as_str(), kind)?;
        } else {
            match table.columns().get(index) {
                Some(column) if column.name == name && column.kind == kind => {}
                Some(column) => {
                    return Err(Error::SchemaMismatch {
                        table: table.name.clone(),
                        detail: format!(
                            "column {} is '{}' ({}) but the header has '{}' ({})",
                            index, column.name, column.kind, name, kind
                        ),
                    })
                }
                None => {
                    return Err(Error::SchemaMismatch {
                        table: table.name.clone(),
                        detail: format!("unexpected extra column '{}'", name),
                    })
                }
            }
        }

        trace!(column = %name, %kind, "header column");
        kinds.push(kind);
        reader.read()?;
    }

    if expected != 0 && kinds.len() != expected {
        return Err(Error::SchemaMismatch {
            table: table.name.clone(),
            detail: format!(
                "expected {} columns but the header has {}",
                expected,
                kinds.len()
            ),
        });
    }

    Ok(kinds)
}

fn read_type_tag<R: TokenReader + ?Sized>(reader: &R, column: &str) -> Result<ColumnKind> {
    let position = reader.position();
    let unknown = |code: String| Error::UnknownTypeTag {
        column: Some(column.to_string()),
        code,
        position: Some(position),
    };

    match reader.current() {
        Some(Token::Number(text)) => {
            let code: i64 = text.parse().map_err(|_| unknown(text.clone()))?;
            ColumnKind::from_code(code).map_err(|_| unknown(text.clone()))
        }
        Some(token) if token.is_scalar() => Err(unknown(token.to_string())),
        other => Err(malformed("a type tag", other, position)),
    }
}

/// Consume one row array, leaving the reader on its `EndArray`
fn read_row<R: TokenReader + ?Sized>(
    reader: &mut R,
    table: &Table,
    kinds: &[ColumnKind],
    row: usize,
) -> Result<Vec<CellValue>> {
    let mut cells = Vec::with_capacity(kinds.len());

    for (index, &kind) in kinds.iter().enumerate() {
        reader.read()?;
        let position = reader.position();
        let token = match reader.current() {
            Some(Token::EndArray) => {
                return Err(Error::RowColumnCountMismatch {
                    row,
                    expected: kinds.len(),
                    found: format!("EndArray after {} cells", index),
                    position,
                })
            }
            Some(token) if token.is_scalar() => token,
            other => return Err(malformed("a cell value", other, position)),
        };

        let value = cell::read_cell(token, kind).ok_or_else(|| Error::InvalidCell {
            row,
            column: table.columns()[index].name.clone(),
            kind,
            found: token.to_string(),
            position,
        })?;
        cells.push(value);
    }

    reader.read()?;
    match reader.current() {
        Some(Token::EndArray) => Ok(cells),
        None => Err(malformed("EndArray", None, reader.position())),
        Some(token) => Err(Error::RowColumnCountMismatch {
            row,
            expected: kinds.len(),
            found: token.to_string(),
            position: reader.position(),
        }),
    }
}

pub(crate) fn malformed(expected: &'static str, found: Option<&Token>, position: usize) -> Error {
    Error::MalformedStructure {
        expected,
        found: describe(found),
        position,
    }
}
