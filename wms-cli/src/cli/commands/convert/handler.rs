//! Convert command handler

use std::fs;

use anyhow::{Context, Result};
use colored::*;

use super::{ConvertArgs, OutputFormat};
use crate::import::{Conversion, FlatRow, Structure, convert_workbook};

pub fn handle_convert_command(args: ConvertArgs) -> Result<()> {
    let structure = if args.flat {
        Structure::Flat
    } else {
        Structure::Nested
    };

    if args.format == OutputFormat::Csv && structure == Structure::Nested {
        anyhow::bail!("CSV output needs the flat structure; add --flat");
    }

    let workbook = args.sheet.load()?;
    let selector = args.sheet.selector();
    let conversion = convert_workbook(&workbook, &selector, structure)
        .with_context(|| format!("Failed to convert {}", args.sheet.file.display()))?;

    let formatted = format_output(&conversion, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &formatted)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            eprintln!(
                "{} {} written to {}",
                conversion.record_count().to_string().bold(),
                record_noun(&conversion),
                path.display().to_string().bright_green()
            );
        }
        None => {
            println!("{}", formatted);
            eprintln!(
                "{} {}",
                conversion.record_count().to_string().bold(),
                record_noun(&conversion).dimmed()
            );
        }
    }

    Ok(())
}

fn record_noun(conversion: &Conversion) -> &'static str {
    match conversion {
        Conversion::Nested(_) => "orders",
        Conversion::Flat(_) => "rows",
    }
}

/// Render a conversion in the requested format
pub fn format_output(conversion: &Conversion, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let value = conversion.to_json().context("Failed to serialize result")?;
            serde_json::to_string_pretty(&value).context("Failed to format JSON output")
        }
        OutputFormat::JsonCompact => {
            let value = conversion.to_json().context("Failed to serialize result")?;
            serde_json::to_string(&value).context("Failed to format JSON output")
        }
        OutputFormat::Csv => match conversion {
            Conversion::Flat(rows) => rows_to_csv(rows),
            Conversion::Nested(_) => anyhow::bail!("CSV output needs the flat structure"),
        },
    }
}

fn rows_to_csv(rows: &[FlatRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if let Some(first) = rows.first() {
        writer.write_record(first.keys())?;
        for row in rows {
            writer.write_record(row.values().map(json_value_to_string))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Convert a JSON value to its CSV cell text
fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{CellValue, Sheet, normalize_flat, normalize_nested};

    fn sheet() -> Sheet {
        let rows = [
            ["ID Pesanan", "Nama Produk", "Jumlah"],
            ["A1", "Widget, large", "2"],
            ["", "Gadget", ""],
        ];
        Sheet::new(
            "Orders",
            rows.iter()
                .map(|r| r.iter().map(|c| CellValue::from(*c)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_csv_output_quotes_and_blanks() {
        let conversion = Conversion::Flat(normalize_flat(&sheet()).unwrap());
        let csv = format_output(&conversion, OutputFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "ID Pesanan,Nama Produk,Jumlah\nA1,\"Widget, large\",2\nA1,Gadget,\n"
        );
    }

    #[test]
    fn test_csv_rejects_nested() {
        let conversion = Conversion::Nested(normalize_nested(&sheet()).unwrap());
        assert!(format_output(&conversion, OutputFormat::Csv).is_err());
    }

    #[test]
    fn test_compact_json() {
        let conversion = Conversion::Nested(normalize_nested(&sheet()).unwrap());
        let json = format_output(&conversion, OutputFormat::JsonCompact).unwrap();
        assert!(json.starts_with(r#"{"orders":[{"order_id":"A1","status":"ready to pick""#));
        assert!(!json.contains('\n'));
    }
}
