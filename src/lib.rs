//! tabjson - Compact JSON encoding for typed tables
//!
//! Tables are written as `[header, row, row, ...]` where the header maps each
//! column name to a small integer type tag, so column names are not repeated
//! on every row. Datasets are JSON objects keyed by table name.
//!
//! ```
//! use tabjson::{codec, CellValue, ColumnKind, Config, Table};
//!
//! let mut table = Table::with_columns("t", [("id", ColumnKind::Int32)]).unwrap();
//! table.add_row(vec![CellValue::Int32(7)]).unwrap();
//!
//! let json = codec::table_to_string(&table, &Config::default()).unwrap();
//! assert_eq!(json, r#"[{"id":3},[7]]"#);
//!
//! let back = codec::table_from_str(&json).unwrap().unwrap();
//! assert_eq!(back.columns(), table.columns());
//! assert_eq!(back.rows(), table.rows());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod token;

pub use config::{Config, NamingPolicy};
pub use error::{Error, Result};
pub use model::{CellValue, Column, ColumnKind, DataSet, Row, Table};
