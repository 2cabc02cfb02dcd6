//! Spreadsheet-to-order normalization
//!
//! Rebuilds hierarchical orders from flat sheet rows. Operators export orders
//! with merged cells, so the order id appears only on the first row of each
//! order and product names only on the first row of each product. Both are
//! forward-filled: the order id across the whole sheet, the product name within
//! one order.
//!
//! Nested mode keeps raw cells until the rows are grouped so each value is
//! converted under its destination field name. Flat mode converts while
//! building rows, under the source column name, and fills afterwards.

use std::collections::HashMap;

use log::{debug, warn};

use super::columns::{DETAIL_COLUMNS, detail_field, fields, order_field};
use super::error::{ImportError, ImportResult};
use super::models::{FlatRow, ImportPayload, OrderDetail, OrderRecord};
use super::value::{CellValue, FieldValue, convert_value, is_valid_json, is_valid_value};
use super::workbook::{Sheet, SheetSelector, Workbook};

/// Output shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Structure {
    /// Orders with nested line items
    #[default]
    Nested,
    /// One object per sheet row
    Flat,
}

/// Result of converting a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Nested(ImportPayload),
    Flat(Vec<FlatRow>),
}

impl Conversion {
    /// Number of top-level records (orders or rows)
    pub fn record_count(&self) -> usize {
        match self {
            Conversion::Nested(payload) => payload.orders.len(),
            Conversion::Flat(rows) => rows.len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Conversion::Nested(payload) => serde_json::to_value(payload),
            Conversion::Flat(rows) => serde_json::to_value(rows),
        }
    }
}

/// Select a sheet and convert it
pub fn convert_workbook(
    workbook: &Workbook,
    selector: &SheetSelector,
    structure: Structure,
) -> ImportResult<Conversion> {
    let sheet = workbook.sheet(selector)?;
    debug!("Converting sheet '{}' as {:?}", sheet.name, structure);

    match structure {
        Structure::Nested => normalize_nested(sheet).map(Conversion::Nested),
        Structure::Flat => normalize_flat(sheet).map(Conversion::Flat),
    }
}

/// A data row keyed by header name, cells unconverted
type RawRecord = HashMap<String, CellValue>;

/// Rows whose first column can be forward-filled
trait FillRow {
    type Cell: Clone;

    fn cell_mut(&mut self, key: &str) -> Option<&mut Self::Cell>;
    fn is_valid(cell: &Self::Cell) -> bool;
}

impl FillRow for RawRecord {
    type Cell = CellValue;

    fn cell_mut(&mut self, key: &str) -> Option<&mut CellValue> {
        self.get_mut(key)
    }

    fn is_valid(cell: &CellValue) -> bool {
        is_valid_value(cell)
    }
}

impl FillRow for FlatRow {
    type Cell = serde_json::Value;

    fn cell_mut(&mut self, key: &str) -> Option<&mut serde_json::Value> {
        self.get_mut(key)
    }

    fn is_valid(cell: &serde_json::Value) -> bool {
        is_valid_json(cell)
    }
}

/// Replace invalid cells in column `key` with the last valid value above them.
/// Cells before the first valid value are left untouched.
fn forward_fill<R: FillRow>(rows: Vec<R>, key: Option<&str>) -> Vec<R> {
    let Some(key) = key else {
        return rows;
    };

    rows.into_iter()
        .scan(None::<R::Cell>, |last_seen, mut row| {
            if let Some(cell) = row.cell_mut(key) {
                if R::is_valid(cell) {
                    *last_seen = Some(cell.clone());
                } else if let Some(previous) = last_seen {
                    *cell = previous.clone();
                }
            }
            Some(row)
        })
        .collect()
}

fn split_header(sheet: &Sheet) -> ImportResult<(Vec<String>, &[Vec<CellValue>])> {
    let (header, data) = sheet
        .rows
        .split_first()
        .ok_or_else(|| ImportError::EmptySheet(sheet.name.clone()))?;

    let headers = header.iter().map(CellValue::text).collect();
    Ok((headers, data))
}

fn raw_record(headers: &[String], row: &[CellValue]) -> RawRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| (header.clone(), row.get(i).cloned().unwrap_or_default()))
        .collect()
}

/// Build nested orders from a sheet
pub fn normalize_nested(sheet: &Sheet) -> ImportResult<ImportPayload> {
    let (headers, data) = split_header(sheet)?;
    let records: Vec<RawRecord> = data.iter().map(|row| raw_record(&headers, row)).collect();
    let filled = forward_fill(records, headers.first().map(String::as_str));

    let detail_columns: Vec<(&str, &'static str)> = headers
        .iter()
        .filter_map(|h| detail_field(h).map(|field| (h.as_str(), field)))
        .collect();
    let order_columns: Vec<(&str, &'static str)> = headers
        .iter()
        .filter_map(|h| order_field(h).map(|field| (h.as_str(), field)))
        .collect();

    if detail_columns.is_empty() {
        warn!(
            "Sheet '{}' has none of the line-item columns ({}); no orders can be built",
            sheet.name,
            DETAIL_COLUMNS
                .iter()
                .map(|(h, _)| *h)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let retained: Vec<RawRecord> = filled
        .into_iter()
        .filter(|row| {
            detail_columns
                .iter()
                .any(|(column, _)| row.get(*column).is_some_and(is_valid_value))
        })
        .collect();
    debug!(
        "{} of {} data rows carry line items",
        retained.len(),
        data.len()
    );

    let key_column = headers.first().map(String::as_str).unwrap_or_default();
    let groups = group_rows(retained, key_column);
    debug!("Grouped rows into {} orders", groups.len());

    let orders = groups
        .iter()
        .filter_map(|(key, rows)| build_order(key, rows, &order_columns, &detail_columns))
        .collect();

    Ok(ImportPayload { orders })
}

/// Group rows by the text of `key_column`, keeping first-seen group order
fn group_rows(rows: Vec<RawRecord>, key_column: &str) -> Vec<(String, Vec<RawRecord>)> {
    let mut groups: Vec<(String, Vec<RawRecord>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = row.get(key_column).map(CellValue::text).unwrap_or_default();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }

    groups
}

fn build_order(
    key: &str,
    rows: &[RawRecord],
    order_columns: &[(&str, &'static str)],
    detail_columns: &[(&str, &'static str)],
) -> Option<OrderRecord> {
    let first = rows.first()?;

    let mut order_id = None;
    let mut has_id_column = false;
    let mut order = OrderRecord::new(String::new());
    for (column, field) in order_columns {
        let cell = first.get(*column);
        match *field {
            fields::ORDER_ID => {
                has_id_column = true;
                order_id = cell
                    .filter(|cell| is_valid_value(cell))
                    .and_then(|cell| convert_value(cell, field))
                    .map(FieldValue::into_text);
            }
            fields::STATUS => {}
            _ => order.set_field(field, cell.and_then(|cell| convert_value(cell, field))),
        }
    }

    // Without an id column the group key stands in for the id. With one, rows
    // above the first valid id have nothing to fill from and cannot be imported.
    order.order_id = match order_id {
        Some(id) => id,
        None if !has_id_column && is_valid_value(&CellValue::from(key)) => key.trim().to_string(),
        None => {
            warn!("Skipping {} row(s) with no order id", rows.len());
            return None;
        }
    };

    order.order_details = rows
        .iter()
        .scan(None::<FieldValue>, |last_product, row| {
            let mut detail = OrderDetail::default();
            for (column, field) in detail_columns {
                let value = row.get(*column).and_then(|cell| convert_value(cell, field));
                detail.set_field(field, value);
            }

            match &detail.product_name {
                Some(name) => *last_product = Some(name.clone()),
                None => detail.product_name = last_product.clone(),
            }
            Some(detail)
        })
        .filter(|detail| !detail.is_empty())
        .collect();

    if order.order_details.is_empty() {
        debug!("Order '{}' has no line items, skipping", order.order_id);
        return None;
    }

    Some(order)
}

/// Build one converted object per sheet row
pub fn normalize_flat(sheet: &Sheet) -> ImportResult<Vec<FlatRow>> {
    let (headers, data) = split_header(sheet)?;

    let rows: Vec<FlatRow> = data
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    let value = convert_value(&cell, header)
                        .map(serde_json::Value::from)
                        .unwrap_or(serde_json::Value::Null);
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    let filled = forward_fill(rows, headers.first().map(String::as_str));
    let total = filled.len();

    let retained: Vec<FlatRow> = filled
        .into_iter()
        .filter(|row| row.values().skip(1).any(is_valid_json))
        .collect();
    debug!("Kept {} of {} flat rows", retained.len(), total);

    Ok(retained)
}

/// Headers of `sheet` that the nested structure ignores
pub fn unmapped_headers(sheet: &Sheet) -> Vec<String> {
    let Some(header) = sheet.rows.first() else {
        return Vec::new();
    };

    header
        .iter()
        .map(CellValue::text)
        .filter(|h| !h.trim().is_empty())
        .filter(|h| order_field(h).is_none() && detail_field(h).is_none())
        .collect()
}
