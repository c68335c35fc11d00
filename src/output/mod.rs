//! Output formatting for decoded tables

mod terminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream};

use crate::model::{DataSet, Table};

pub use terminal::TerminalOutput;

/// Render a dataset to stdout
pub fn render_dataset_to_stdout(
    dataset: &DataSet,
    output: &TerminalOutput,
    color: ColorChoice,
) -> Result<()> {
    let mut stdout = StandardStream::stdout(color);
    output.render_dataset(dataset, &mut stdout)
}

/// Render a single table to stdout
pub fn render_table_to_stdout(table: &Table, output: &TerminalOutput, color: ColorChoice) -> Result<()> {
    let mut stdout = StandardStream::stdout(color);
    output.render_table(table, &mut stdout)
}
