//! Bulk order import: spreadsheet reading and order normalization
//!
//! The pipeline is `read_workbook` -> `convert_workbook` -> JSON. Everything
//! in here is synchronous and free of network I/O.

pub mod columns;
mod error;
mod models;
mod normalize;
mod template;
mod value;
mod workbook;

pub use error::{ImportError, ImportResult};
pub use models::{FlatRow, ImportPayload, OrderDetail, OrderRecord};
pub use normalize::{
    Conversion, Structure, convert_workbook, normalize_flat, normalize_nested, unmapped_headers,
};
pub use template::{TEMPLATE_SHEET, write_template};
pub use value::{CellValue, FieldValue, convert_value, is_valid_value};
pub use workbook::{
    Grid, Sheet, SheetSelector, Workbook, read_csv_bytes, read_workbook, read_workbook_bytes,
};
