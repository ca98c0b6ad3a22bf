//! Argument parsing for the `flatsheet` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "flatsheet", version, about = "Edit a shared sheet from the command line")]
pub struct Cli {
    /// Path to the workspace database (defaults to the platform data dir)
    #[arg(long, env = "FLATSHEET_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current rows
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },
    /// Append a blank row
    AddRow,
    /// Append a column
    AddColumn {
        /// Display label of the new column
        name: String,
    },
    /// Overwrite one cell: row is 1-based, column is its label
    Set {
        row: usize,
        column: String,
        value: String,
    },
    /// Delete a row and its contents (asks for confirmation)
    DestroyRow { row: usize },
    /// Delete a column and its contents (asks for confirmation)
    DestroyColumn { column: String },
    /// Start over with an empty workspace (asks for confirmation)
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowFormat {
    Json,
    Csv,
}
