//! Blank import template for operators

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook};

use super::columns::known_headers;

/// Name of the sheet written into the template
pub const TEMPLATE_SHEET: &str = "Orders";

/// Write an .xlsx file with the recognized header row and nothing else
pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White);

    for (col, header) in known_headers().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, header, &header_format)?;
        sheet.set_column_width(col, 18)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Import template written to: {}", path.display());
    Ok(())
}
