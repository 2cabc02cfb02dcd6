//! Cell values and the conversion rules applied to them
//!
//! Spreadsheet cells arrive untyped. Conversion into [`FieldValue`] depends on
//! the destination field: identifiers are never numerically coerced, quantities
//! are parsed as integers, and numeric-looking text elsewhere becomes a number.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::columns::fields;

/// Text that counts as "no value" when deciding forward-fill and row retention
const INVALID_TOKENS: &[&str] = &["", "nan", "none", "nat", "undefined", "null"];

/// Text that converts to null. A subset of [`INVALID_TOKENS`]
const NULL_TOKENS: &[&str] = &["", "nan", "none", "nat"];

static NUMERIC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("numeric pattern compiles"));

/// A raw spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing cell (row shorter than the header)
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// String form of the cell, as used for validity checks and group keys
    pub fn text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<FieldValue> for CellValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Bool(b) => CellValue::Bool(b),
            FieldValue::Int(i) => CellValue::Int(i),
            FieldValue::Float(f) => CellValue::Float(f),
            FieldValue::Text(s) => CellValue::String(s),
        }
    }
}

/// A converted cell, ready for the wire. Serializes as a bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Render as text, for fields the backend expects as strings
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Bool(b) => serde_json::Value::Bool(b),
            FieldValue::Int(i) => serde_json::json!(i),
            FieldValue::Float(f) => serde_json::json!(f),
            FieldValue::Text(s) => serde_json::Value::String(s),
        }
    }
}

fn is_valid_text(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    !INVALID_TOKENS.contains(&normalized.as_str())
}

/// Whether a cell holds a meaningful value
pub fn is_valid_value(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty => false,
        other => is_valid_text(&other.text()),
    }
}

/// Same check as [`is_valid_value`] for an already converted JSON cell
pub fn is_valid_json(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => is_valid_text(s),
        other => is_valid_text(&other.to_string()),
    }
}

/// Convert a cell for the given destination field (or source column) name
pub fn convert_value(cell: &CellValue, field: &str) -> Option<FieldValue> {
    match cell {
        CellValue::Empty => None,
        CellValue::Bool(b) => Some(FieldValue::Bool(*b)),
        CellValue::Int(i) => Some(FieldValue::Int(*i)),
        CellValue::Float(f) if f.is_finite() => Some(FieldValue::Float(*f)),
        CellValue::Float(_) => None,
        CellValue::String(s) => convert_text(s, field),
    }
}

fn convert_text(raw: &str, field: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    if NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }

    // Long numeric identifiers must survive as text
    if field == fields::ORDER_ID || field == fields::TRACKING {
        return Some(FieldValue::Text(trimmed.to_string()));
    }

    if field == fields::QUANTITY || field == fields::QUANTITY_COLUMN {
        if let Some(quantity) = parse_leading_int(trimmed) {
            return Some(FieldValue::Int(quantity));
        }
    }

    if NUMERIC_TEXT.is_match(trimmed) {
        if let Some(number) = parse_numeric(trimmed) {
            return Some(number);
        }
    }

    Some(FieldValue::Text(trimmed.to_string()))
}

/// Parse an optional sign followed by leading digits, ignoring any trailing text.
/// "7" -> 7, "3.5" -> 3, "12 pcs" -> 12, "pcs" -> None
fn parse_leading_int(s: &str) -> Option<i64> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);
    if digits.is_empty() {
        return None;
    }

    let sign_len = s.len() - unsigned.len();
    s[..sign_len + digits.len()].parse().ok()
}

fn parse_numeric(s: &str) -> Option<FieldValue> {
    if !s.contains('.') {
        if let Ok(i) = s.parse::<i64>() {
            return Some(FieldValue::Int(i));
        }
    }
    s.parse::<f64>().ok().map(FieldValue::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_tokens() {
        assert!(!is_valid_value(&CellValue::Empty));
        for token in ["", "  ", "nan", "NaN", " None ", "NaT", "undefined", "NULL"] {
            assert!(!is_valid_value(&CellValue::from(token)), "{token:?}");
        }
        assert!(is_valid_value(&CellValue::from("A1")));
        assert!(is_valid_value(&CellValue::Int(0)));
        assert!(is_valid_value(&CellValue::Bool(false)));
        assert!(!is_valid_value(&CellValue::Float(f64::NAN)));
    }

    #[test]
    fn test_null_tokens_convert_to_none() {
        for token in ["", "nan", "None", " NAT "] {
            assert_eq!(convert_value(&CellValue::from(token), "sku"), None);
        }
        // Invalid but not null: passes through as text
        assert_eq!(
            convert_value(&CellValue::from("undefined"), "sku"),
            Some(FieldValue::Text("undefined".into()))
        );
        assert_eq!(convert_value(&CellValue::Empty, "sku"), None);
    }

    #[test]
    fn test_identifiers_keep_text() {
        let long_id = CellValue::from(" 1234567890123456 ");
        assert_eq!(
            convert_value(&long_id, fields::ORDER_ID),
            Some(FieldValue::Text("1234567890123456".into()))
        );
        assert_eq!(
            convert_value(&CellValue::from("000123"), fields::TRACKING),
            Some(FieldValue::Text("000123".into()))
        );
        // Other fields get numeric coercion
        assert_eq!(
            convert_value(&long_id, "buyer"),
            Some(FieldValue::Int(1234567890123456))
        );
    }

    #[test]
    fn test_quantity_parsing() {
        assert_eq!(
            convert_value(&CellValue::from("7"), fields::QUANTITY),
            Some(FieldValue::Int(7))
        );
        assert_eq!(
            convert_value(&CellValue::from("7"), fields::QUANTITY_COLUMN),
            Some(FieldValue::Int(7))
        );
        assert_eq!(
            convert_value(&CellValue::from("3.5"), fields::QUANTITY),
            Some(FieldValue::Int(3))
        );
        assert_eq!(
            convert_value(&CellValue::from("-2"), fields::QUANTITY),
            Some(FieldValue::Int(-2))
        );
        assert_eq!(
            convert_value(&CellValue::from("dua"), fields::QUANTITY),
            Some(FieldValue::Text("dua".into()))
        );
        assert_eq!(convert_value(&CellValue::from(""), fields::QUANTITY), None);
    }

    #[test]
    fn test_numeric_sniffing() {
        assert_eq!(
            convert_value(&CellValue::from("42"), "channel"),
            Some(FieldValue::Int(42))
        );
        assert_eq!(
            convert_value(&CellValue::from("1.50"), "channel"),
            Some(FieldValue::Float(1.5))
        );
        // Not matching the pattern: kept as text, case preserved
        for text in ["-5", "1e3", "1.", ".5", "12 pcs", "Shopee"] {
            assert_eq!(
                convert_value(&CellValue::from(text), "channel"),
                Some(FieldValue::Text(text.into()))
            );
        }
        // Overflowing integers degrade to floats
        assert_eq!(
            convert_value(&CellValue::from("99999999999999999999"), "channel"),
            Some(FieldValue::Float(1e20))
        );
    }

    #[test]
    fn test_non_text_cells_unchanged() {
        assert_eq!(
            convert_value(&CellValue::Int(5), fields::ORDER_ID),
            Some(FieldValue::Int(5))
        );
        assert_eq!(
            convert_value(&CellValue::Float(2.25), "sku"),
            Some(FieldValue::Float(2.25))
        );
        assert_eq!(
            convert_value(&CellValue::Bool(true), "sku"),
            Some(FieldValue::Bool(true))
        );
    }

    #[test]
    fn test_reconversion_is_idempotent() {
        let cases = [
            (FieldValue::Int(7), fields::QUANTITY),
            (FieldValue::Float(1.5), "variant"),
            (FieldValue::Bool(false), "buyer"),
            (FieldValue::Text("Widget".into()), fields::PRODUCT_NAME),
            (FieldValue::Text("1234567890123456".into()), fields::ORDER_ID),
        ];

        for (value, field) in cases {
            let again = convert_value(&CellValue::from(value.clone()), field);
            assert_eq!(again, Some(value));
        }
    }

    #[test]
    fn test_json_validity() {
        assert!(!is_valid_json(&serde_json::Value::Null));
        assert!(!is_valid_json(&serde_json::json!("NaN")));
        assert!(is_valid_json(&serde_json::json!(0)));
        assert!(is_valid_json(&serde_json::json!("x")));
    }

    #[test]
    fn test_field_value_text() {
        assert_eq!(FieldValue::Int(1001).into_text(), "1001");
        assert_eq!(FieldValue::Text("A1".into()).into_text(), "A1");
        assert_eq!(
            serde_json::to_string(&FieldValue::Float(1.5)).unwrap(),
            "1.5"
        );
    }
}
