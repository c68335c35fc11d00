//! Compact JSON codecs for tables and datasets
//!
//! The `read_*`/`write_*` functions drive a caller-owned token cursor and are
//! the building blocks for embedding the encoding in a larger document. The
//! string and stream helpers cover the common case where a table or dataset
//! is the whole document.

pub mod cell;
mod dataset;
mod table;

use std::io::{Read, Write};

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::model::{DataSet, Table};
use crate::token::{TokenReader, TokenWriter, ValueReader, ValueWriter};

pub use dataset::{read_dataset, write_dataset};
pub use table::{read_table, write_table};

fn render(value: &Value, config: &Config) -> Result<String> {
    let json = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn open(mut reader: ValueReader) -> Result<ValueReader> {
    reader.read()?;
    Ok(reader)
}

/// Encode a table as a JSON document
pub fn table_to_string(table: &Table, config: &Config) -> Result<String> {
    let mut writer = ValueWriter::new();
    write_table(&mut writer, table)?;
    render(&writer.finish()?, config)
}

/// Decode a table document; `Ok(None)` when the document is `null`
pub fn table_from_str(json: &str) -> Result<Option<Table>> {
    let mut reader = open(ValueReader::from_json(json)?)?;
    read_table(&mut reader, None)
}

/// Decode a table document into an existing table
pub fn table_from_str_into(json: &str, target: Table) -> Result<Option<Table>> {
    let mut reader = open(ValueReader::from_json(json)?)?;
    read_table(&mut reader, Some(target))
}

/// Encode a dataset as a JSON document
pub fn dataset_to_string(dataset: &DataSet, config: &Config) -> Result<String> {
    let mut writer = ValueWriter::new();
    write_dataset(&mut writer, dataset, &config.naming)?;
    render(&writer.finish()?, config)
}

/// Decode a dataset document; `Ok(None)` when the document is `null`
pub fn dataset_from_str(json: &str) -> Result<Option<DataSet>> {
    let mut reader = open(ValueReader::from_json(json)?)?;
    read_dataset(&mut reader, None)
}

/// Decode a dataset document into an existing dataset
pub fn dataset_from_str_into(json: &str, target: DataSet) -> Result<Option<DataSet>> {
    let mut reader = open(ValueReader::from_json(json)?)?;
    read_dataset(&mut reader, Some(target))
}

/// Encode a dataset to a byte stream
pub fn dataset_to_writer<W: Write>(mut out: W, dataset: &DataSet, config: &Config) -> Result<()> {
    let json = dataset_to_string(dataset, config)?;
    out.write_all(json.as_bytes())?;
    Ok(())
}

/// Decode a dataset from a byte stream
pub fn dataset_from_reader<R: Read>(input: R) -> Result<Option<DataSet>> {
    let mut reader = open(ValueReader::from_reader(input)?)?;
    read_dataset(&mut reader, None)
}

/// Decode a table from a byte stream
pub fn table_from_reader<R: Read>(input: R) -> Result<Option<Table>> {
    let mut reader = open(ValueReader::from_reader(input)?)?;
    read_table(&mut reader, None)
}

/// Write a table, or `null` when it is absent
pub fn write_optional_table<W: TokenWriter + ?Sized>(writer: &mut W, table: Option<&Table>) -> Result<()> {
    match table {
        Some(table) => write_table(writer, table),
        None => writer.write_null(),
    }
}
