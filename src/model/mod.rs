//! Data model for typed tables and datasets

mod dataset;
mod schema;
mod table;

pub use dataset::DataSet;
pub use schema::{Column, ColumnKind};
pub use table::{CellValue, Row, Table, DATETIME_FORMAT};
