//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use commands::{ConvertArgs, SendArgs, SheetArgs, TemplateArgs};

#[derive(Debug, Parser)]
#[command(
    name = "wms-cli",
    version,
    about = "Convert order spreadsheets and bulk-import them into the warehouse backend"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the sheets of a workbook
    Sheets(SheetArgs),
    /// Convert a sheet into import JSON
    Convert(ConvertArgs),
    /// Convert a sheet and submit it to the bulk-import endpoint
    Send(SendArgs),
    /// Write a blank import template
    Template(TemplateArgs),
    /// Show the effective configuration
    Config,
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    match cli.command {
        Commands::Sheets(args) => commands::sheets::handle_sheets_command(args),
        Commands::Convert(args) => commands::convert::handle_convert_command(args),
        Commands::Send(args) => commands::send::handle_send_command(args).await,
        Commands::Template(args) => commands::template::handle_template_command(args),
        Commands::Config => commands::config::handle_config_command(),
    }
}
