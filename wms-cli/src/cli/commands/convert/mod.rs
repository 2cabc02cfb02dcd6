//! `convert` command: turn a sheet into import JSON

mod handler;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::SheetArgs;

pub use handler::{format_output, handle_convert_command};

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// One object per row instead of orders with nested line items
    #[arg(long)]
    pub flat: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// CSV (flat structure only)
    Csv,
}
