//! Colored terminal output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::{DataSet, Table};

/// Renders decoded tables as text grids
pub struct TerminalOutput {
    max_rows: Option<usize>,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { max_rows: None }
    }

    /// Show at most `max_rows` rows per table
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
        }
    }

    fn write_title(&self, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        writer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Cyan)))?;
        let name = if table.name.is_empty() { "(unnamed)" } else { table.name.as_str() };
        write!(writer, "{}", name)?;
        writer.reset()?;
        writeln!(
            writer,
            " ({} columns, {} rows)",
            table.column_count(),
            table.row_count()
        )?;
        Ok(())
    }

    /// Render one table
    pub fn render_table(&self, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_title(table, writer)?;

        if table.column_count() == 0 {
            writeln!(writer, "  (no columns)")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(
            table
                .columns()
                .iter()
                .map(|c| format!("{}: {}", c.name, c.kind)),
        );

        let shown = self.max_rows.unwrap_or(usize::MAX);
        for row in table.rows().iter().take(shown) {
            builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
        }

        let mut grid = builder.build();
        grid.with(Style::modern());
        writeln!(writer, "{}", grid)?;

        let hidden = table.row_count().saturating_sub(shown);
        if hidden > 0 {
            writer.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(writer, "  ... {} more rows", hidden)?;
            writer.reset()?;
        }
        Ok(())
    }

    /// Render every table of a dataset, separated by blank lines
    pub fn render_dataset(&self, dataset: &DataSet, writer: &mut dyn WriteColor) -> Result<()> {
        if dataset.is_empty() {
            writeln!(writer, "(empty dataset)")?;
            return Ok(());
        }

        for (i, table) in dataset.tables().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            self.render_table(table, writer)?;
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, ColumnKind};
    use termcolor::NoColor;

    fn rendered(output: &TerminalOutput, table: &Table) -> String {
        let mut buf = NoColor::new(Vec::new());
        output.render_table(table, &mut buf).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_render_table() {
        let mut table =
            Table::with_columns("pets", [("name", ColumnKind::String), ("age", ColumnKind::Byte)]).unwrap();
        table.add_row(vec!["rex".into(), 3u8.into()]).unwrap();
        table.add_row(vec!["tom".into(), CellValue::Null]).unwrap();

        let text = rendered(&TerminalOutput::new(), &table);
        assert!(text.starts_with("pets (2 columns, 2 rows)"));
        assert!(text.contains("name: string"));
        assert!(text.contains("age: byte"));
        assert!(text.contains("rex"));
        assert!(text.contains("NULL"));
    }

    #[test]
    fn test_row_limit() {
        let mut table = Table::with_columns("n", [("v", ColumnKind::Int32)]).unwrap();
        for i in 0..5 {
            table.add_row(vec![CellValue::Int32(i)]).unwrap();
        }

        let text = rendered(&TerminalOutput::with_max_rows(2), &table);
        assert!(text.contains("... 3 more rows"));
    }
}
