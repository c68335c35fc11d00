//! Error types for encoding and decoding tables

use thiserror::Error;

use crate::model::ColumnKind;

/// Errors raised by the model and the codecs.
///
/// Token positions count tokens from the start of the input, the first token
/// being 1. Row numbers are 0-based.
#[derive(Debug, Error)]
pub enum Error {
    /// A structural delimiter is missing where the encoding requires one.
    #[error("expected {expected} but found {found} at token {position}")]
    MalformedStructure {
        expected: &'static str,
        found: String,
        position: usize,
    },

    /// A header entry carries a type tag outside the registry.
    #[error("unknown type tag {code}{}", tag_location(.column, .position))]
    UnknownTypeTag {
        column: Option<String>,
        code: String,
        position: Option<usize>,
    },

    /// A row does not close right after one cell per column.
    #[error(
        "row {row} should end after {expected} cells but found {found} at token {position}; \
         it is possible that there is a column count mismatch"
    )]
    RowColumnCountMismatch {
        row: usize,
        expected: usize,
        found: String,
        position: usize,
    },

    /// A cell token cannot be read as its column's kind.
    #[error("cannot read {found} as {kind} for column '{column}' in row {row} at token {position}")]
    InvalidCell {
        row: usize,
        column: String,
        kind: ColumnKind,
        found: String,
        position: usize,
    },

    /// A reused table's columns disagree with the encoded header.
    #[error("table '{table}' does not match the encoded schema: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("duplicate table name '{0}'")]
    DuplicateTable(String),

    #[error("no table named '{0}'")]
    UnknownTable(String),

    #[error("row has {actual} cells but table '{table}' has {expected} columns")]
    ArityMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("cell {index} holds a {found} value but column '{column}' is {expected}")]
    CellKindMismatch {
        column: String,
        index: usize,
        expected: ColumnKind,
        found: ColumnKind,
    },

    /// The token writer was driven out of order or asked for invalid output.
    #[error("token writer: {0}")]
    Writer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn tag_location(column: &Option<String>, position: &Option<usize>) -> String {
    let mut location = String::new();
    if let Some(column) = column {
        location.push_str(&format!(" for column '{}'", column));
    }
    if let Some(position) = position {
        location.push_str(&format!(" at token {}", position));
    }
    location
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_token() {
        let err = Error::MalformedStructure {
            expected: "StartArray",
            found: "Number 3".into(),
            position: 1,
        };
        assert_eq!(err.to_string(), "expected StartArray but found Number 3 at token 1");

        let err = Error::UnknownTypeTag {
            column: Some("a".into()),
            code: "12".into(),
            position: Some(4),
        };
        assert_eq!(err.to_string(), "unknown type tag 12 for column 'a' at token 4");

        let err = Error::UnknownTypeTag {
            column: None,
            code: "12".into(),
            position: None,
        };
        assert_eq!(err.to_string(), "unknown type tag 12");
    }
}
