//! tabjson - Compact JSON encoding for typed tables

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

use tabjson::codec;
use tabjson::config::{Config, NamingPolicy};
use tabjson::model::{ColumnKind, DataSet, Table};
use tabjson::output::{render_dataset_to_stdout, render_table_to_stdout, TerminalOutput};
use tabjson::parser::CsvParser;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNaming {
    Identity,
    Camel,
    Snake,
}

impl From<CliNaming> for NamingPolicy {
    fn from(n: CliNaming) -> Self {
        match n {
            CliNaming::Identity => NamingPolicy::Identity,
            CliNaming::Camel => NamingPolicy::CamelCase,
            CliNaming::Snake => NamingPolicy::SnakeCase,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColor {
    Auto,
    Always,
    Never,
}

impl From<CliColor> for ColorChoice {
    fn from(c: CliColor) -> Self {
        match c {
            CliColor::Auto => ColorChoice::Auto,
            CliColor::Always => ColorChoice::Always,
            CliColor::Never => ColorChoice::Never,
        }
    }
}

/// Compact JSON encoding for typed tables
#[derive(Parser, Debug)]
#[command(name = "tabjson")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a compact JSON file and print its tables
    Inspect {
        /// Compact JSON file
        file: PathBuf,

        /// The file holds a single table rather than a dataset
        #[arg(long)]
        table: bool,

        /// Show at most this many rows per table
        #[arg(long)]
        limit: Option<usize>,

        /// When to use colors
        #[arg(long, value_enum, default_value = "auto")]
        color: CliColor,
    },

    /// Decode a compact JSON file and report whether it is well formed
    Check {
        /// Compact JSON file
        file: PathBuf,

        /// The file holds a single table rather than a dataset
        #[arg(long)]
        table: bool,
    },

    /// Convert a CSV file into a compact JSON table
    FromCsv {
        /// CSV file with a header line
        file: PathBuf,

        /// Table name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Force a column kind instead of inferring it, e.g. `zip=string`
        #[arg(long = "kind", value_parser = parse_kind_override)]
        kinds: Vec<(String, ColumnKind)>,

        /// Wrap the table in a dataset object keyed by its name
        #[arg(long)]
        dataset: bool,

        /// Naming policy for the dataset key
        #[arg(long, value_enum, default_value = "identity")]
        naming: CliNaming,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
}

fn parse_kind_override(s: &str) -> Result<(String, ColumnKind), String> {
    let (column, kind) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=KIND, got '{}'", s))?;
    Ok((column.to_string(), kind.parse()?))
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("tabjson=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Inspect {
            file,
            table,
            limit,
            color,
        } => {
            let output = limit.map_or_else(TerminalOutput::new, TerminalOutput::with_max_rows);
            if table {
                match load_table(&file)? {
                    Some(t) => render_table_to_stdout(&t, &output, color.into())?,
                    None => println!("null"),
                }
            } else {
                match load_dataset(&file)? {
                    Some(ds) => render_dataset_to_stdout(&ds, &output, color.into())?,
                    None => println!("null"),
                }
            }
        }
        Command::Check { file, table } => {
            if table {
                match load_table(&file)? {
                    Some(t) => println!(
                        "ok: {} columns, {} rows",
                        t.column_count(),
                        t.row_count()
                    ),
                    None => println!("ok: null"),
                }
            } else {
                match load_dataset(&file)? {
                    Some(ds) => println!(
                        "ok: {} tables, {} rows",
                        ds.len(),
                        ds.tables().map(Table::row_count).sum::<usize>()
                    ),
                    None => println!("ok: null"),
                }
            }
        }
        Command::FromCsv {
            file,
            name,
            kinds,
            dataset,
            naming,
            pretty,
        } => {
            let name = name.unwrap_or_else(|| file_stem(&file));
            let parser = kinds
                .into_iter()
                .fold(CsvParser::new(), |p, (column, kind)| p.with_kind(column, kind));
            let table = parser
                .parse_path(&file, &name)
                .with_context(|| format!("Failed to parse CSV file: {}", file.display()))?;

            let config = Config::new().with_naming(naming.into()).with_pretty(pretty);
            let json = if dataset {
                let mut ds = DataSet::new(name);
                ds.add_table(table)?;
                codec::dataset_to_string(&ds, &config)?
            } else {
                codec::table_to_string(&table, &config)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn load_dataset(path: &Path) -> Result<Option<DataSet>> {
    codec::dataset_from_reader(open(path)?)
        .with_context(|| format!("Failed to decode dataset: {}", path.display()))
}

fn load_table(path: &Path) -> Result<Option<Table>> {
    let table = codec::table_from_reader(open(path)?)
        .with_context(|| format!("Failed to decode table: {}", path.display()))?;

    Ok(table.map(|mut t| {
        t.name = file_stem(path);
        t
    }))
}
