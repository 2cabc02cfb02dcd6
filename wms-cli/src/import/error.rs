//! Errors raised while reading and normalizing order sheets

use std::path::PathBuf;

use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The requested sheet name/index does not resolve to a sheet
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// The selected sheet has no rows, not even a header
    #[error("sheet '{0}' is empty")]
    EmptySheet(String),

    /// The file could not be decoded as a spreadsheet
    #[error("failed to parse workbook: {0}")]
    WorkbookParse(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
