//! Importers that build typed tables from plain data files

mod csv;

pub use self::csv::CsvParser;
