//! `sheets` command: list the sheets of a workbook

use anyhow::Result;
use colored::*;

use super::SheetArgs;
use crate::import::unmapped_headers;

pub fn handle_sheets_command(args: SheetArgs) -> Result<()> {
    let workbook = args.load()?;

    if workbook.sheets().is_empty() {
        println!("{}", "Workbook has no sheets".yellow());
        return Ok(());
    }

    for (index, sheet) in workbook.sheets().iter().enumerate() {
        println!(
            "{:>3}  {}  {}",
            index.to_string().dimmed(),
            sheet.name.bold(),
            format!("({} data rows)", sheet.data_row_count()).dimmed()
        );

        let ignored = unmapped_headers(sheet);
        if !ignored.is_empty() {
            println!("     {} {}", "ignored columns:".dimmed(), ignored.join(", "));
        }
    }

    Ok(())
}
