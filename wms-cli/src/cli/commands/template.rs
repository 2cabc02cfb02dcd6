//! `template` command: write a blank import template

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::import::write_template;

#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Where to write the .xlsx template
    #[arg(default_value = "order-import-template.xlsx")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn handle_template_command(args: TemplateArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    write_template(&args.output)?;
    println!(
        "Template written to: {}",
        args.output.display().to_string().bright_green()
    );
    Ok(())
}
