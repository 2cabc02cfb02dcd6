//! Subcommand arguments and handlers

pub mod config;
pub mod convert;
pub mod send;
pub mod sheets;
pub mod template;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use crate::import::{SheetSelector, Workbook, read_workbook};

pub use convert::ConvertArgs;
pub use send::SendArgs;
pub use template::TemplateArgs;

/// Input file and sheet selection shared by several commands
#[derive(Debug, Clone, Args)]
pub struct SheetArgs {
    /// Spreadsheet to read (.xlsx, .xls, .xlsb, .ods or .csv)
    pub file: PathBuf,

    /// Sheet name to convert
    #[arg(long)]
    pub sheet: Option<String>,

    /// Zero-based sheet index; takes priority over --sheet
    #[arg(long, value_name = "N")]
    pub sheet_index: Option<usize>,
}

impl SheetArgs {
    pub fn selector(&self) -> SheetSelector {
        SheetSelector {
            index: self.sheet_index,
            name: self.sheet.clone(),
        }
    }

    /// Read the workbook named by `file`
    pub fn load(&self) -> Result<Workbook> {
        if !self.file.exists() {
            anyhow::bail!("File does not exist: {}", self.file.display());
        }
        debug!("Reading workbook {}", self.file.display());
        read_workbook(&self.file)
            .with_context(|| format!("Failed to load spreadsheet: {}", self.file.display()))
    }
}
