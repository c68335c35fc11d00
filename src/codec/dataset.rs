//! Compact encoding of a dataset: one JSON object keyed by table name

use std::collections::HashSet;

use tracing::debug;

use super::table::{malformed, read_table, write_table};
use crate::config::NamingPolicy;
use crate::error::{Error, Result};
use crate::model::DataSet;
use crate::token::{Token, TokenReader, TokenWriter};

/// Write every table of `dataset`, in order, under its transformed name
pub fn write_dataset<W: TokenWriter + ?Sized>(
    writer: &mut W,
    dataset: &DataSet,
    naming: &NamingPolicy,
) -> Result<()> {
    writer.start_object()?;
    for table in dataset.tables() {
        writer.property_name(&naming.apply(&table.name))?;
        write_table(writer, table)?;
    }
    writer.end_object()?;

    debug!(tables = dataset.len(), "encoded dataset");
    Ok(())
}

/// Read a dataset starting at the reader's current token.
///
/// Returns `None` for a `null` token. Wire keys are used verbatim as table
/// names. When `target` is given, tables it already holds are decoded in
/// place (see [`read_table`]) and unknown ones are appended in wire order.
///
/// On success the reader rests on the closing `EndObject`.
pub fn read_dataset<R: TokenReader + ?Sized>(
    reader: &mut R,
    target: Option<DataSet>,
) -> Result<Option<DataSet>> {
    match reader.current() {
        Some(Token::Null) => return Ok(None),
        Some(Token::StartObject) => {}
        other => return Err(malformed("StartObject", other, reader.position())),
    }

    let mut dataset = target.unwrap_or_default();
    let mut seen = HashSet::new();

    reader.read()?;
    while let Some(Token::PropertyName(name)) = reader.current() {
        let name = name.clone();
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateTable(name));
        }
        reader.read()?;

        let position = reader.position();
        let existing = dataset.table_mut(&name).map(std::mem::take);
        let exists = existing.is_some();

        let mut table = read_table(reader, existing)?.ok_or_else(|| Error::MalformedStructure {
            expected: "StartArray",
            found: format!("Null for table '{}'", name),
            position,
        })?;
        table.name = name.clone();

        if !exists {
            dataset.add_table(table)?;
        } else if let Some(slot) = dataset.table_mut(&name) {
            *slot = table;
        }

        reader.read()?;
    }

    if !matches!(reader.current(), Some(Token::EndObject)) {
        return Err(malformed("PropertyName or EndObject", reader.current(), reader.position()));
    }

    debug!(tables = dataset.len(), "decoded dataset");
    Ok(Some(dataset))
}
