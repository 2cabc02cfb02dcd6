//! Spreadsheet reading
//!
//! Decodes spreadsheet bytes into a [`Workbook`]: named sheets, each a
//! row-major grid of [`CellValue`]s with the header in row 0. Excel and
//! OpenDocument files go through calamine, `.csv` files through the csv crate.
//! Blank cells are kept as empty strings so that null detection happens in one
//! place, the normalizer.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::debug;

use super::error::{ImportError, ImportResult};
use super::value::CellValue;

/// Row-major cells of one sheet
pub type Grid = Vec<Vec<CellValue>>;

/// A named sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Grid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Grid) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Number of data rows, excluding the header
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Which sheet to convert. The index wins over the name; an out-of-range
/// index falls back to the first sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetSelector {
    pub index: Option<usize>,
    pub name: Option<String>,
}

impl SheetSelector {
    pub fn first() -> Self {
        Self::default()
    }

    pub fn by_index(index: usize) -> Self {
        Self {
            index: Some(index),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            index: None,
            name: Some(name.into()),
        }
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.index, &self.name) {
            (Some(index), _) => write!(f, "#{}", index),
            (None, Some(name)) => write!(f, "'{}'", name),
            (None, None) => write!(f, "first sheet"),
        }
    }
}

/// Named sheets in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Resolve a selector to a sheet
    pub fn sheet(&self, selector: &SheetSelector) -> ImportResult<&Sheet> {
        if let Some(index) = selector.index {
            if let Some(sheet) = self.sheets.get(index) {
                return Ok(sheet);
            }
            debug!("Sheet index {} out of range, using the first sheet", index);
            return self
                .sheets
                .first()
                .ok_or_else(|| ImportError::SheetNotFound(selector.to_string()));
        }

        match &selector.name {
            Some(name) => self
                .sheets
                .iter()
                .find(|s| &s.name == name)
                .ok_or_else(|| ImportError::SheetNotFound(selector.to_string())),
            None => self
                .sheets
                .first()
                .ok_or_else(|| ImportError::SheetNotFound(selector.to_string())),
        }
    }
}

/// Read a spreadsheet file, choosing the decoder by extension
pub fn read_workbook<P: AsRef<Path>>(path: P) -> ImportResult<Workbook> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1");
        read_csv_bytes(&bytes, name)
    } else {
        read_workbook_bytes(bytes)
    }
}

/// Decode Excel (xlsx, xlsm, xlsb, xls) or OpenDocument bytes
pub fn read_workbook_bytes(bytes: Vec<u8>) -> ImportResult<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::WorkbookParse(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ImportError::WorkbookParse(format!("sheet '{}': {}", name, e)))?;

        let rows: Grid = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        debug!("Read sheet '{}' with {} rows", name, rows.len());
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Decode CSV bytes as a single-sheet workbook
pub fn read_csv_bytes(bytes: &[u8], sheet_name: &str) -> ImportResult<Workbook> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Grid::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::WorkbookParse(e.to_string()))?;
        rows.push(record.iter().map(CellValue::from).collect());
    }

    debug!("Read CSV sheet '{}' with {} rows", sheet_name, rows.len());
    Ok(Workbook::new(vec![Sheet::new(sheet_name, rows)]))
}

/// Convert a calamine cell
fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::String(String::new()),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            // Whole numbers are stored as floats by Excel
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::String(format!("{}", dt)),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::String(String::new()),
    }
}
