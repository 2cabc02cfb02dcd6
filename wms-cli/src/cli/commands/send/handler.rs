//! Send command handler

use anyhow::{Context, Result};
use colored::*;
use log::{info, warn};

use super::SendArgs;
use crate::api::{
    BulkImportClient, BulkImportResponse, OutcomeKind, ResilienceConfig, RetryConfig,
};
use crate::config::Config;
use crate::import::{ImportPayload, normalize_nested};

pub async fn handle_send_command(args: SendArgs) -> Result<()> {
    let workbook = args.sheet.load()?;
    let selector = args.sheet.selector();

    let payload = workbook
        .sheet(&selector)
        .and_then(normalize_nested)
        .with_context(|| format!("Failed to convert {}", args.sheet.file.display()))?;

    if payload.orders.is_empty() {
        anyhow::bail!(
            "No orders found in {} (is the sheet missing the line-item columns?)",
            args.sheet.file.display()
        );
    }

    // Status goes to stderr so a dry run's stdout is just the request body
    eprintln!(
        "Prepared {} orders with {} line items",
        payload.orders.len().to_string().bold(),
        payload.detail_count().to_string().bold()
    );

    if args.dry {
        println!("{}", dry_run_body(&payload)?);
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(url) = args.url {
        config.api.base_url = url;
    }

    let mut resilience = ResilienceConfig::from_settings(&config.retry);
    if args.no_retry {
        resilience.retry = RetryConfig::none();
    }

    let client = BulkImportClient::new(&config.api, resilience)?;
    info!("Submitting to {}", client.endpoint());
    println!("Sending to {}...", client.endpoint().cyan());

    let response = client.submit(&payload).await?;
    print_response(&response);

    if !response.success {
        anyhow::bail!(
            "Bulk import was rejected: {}",
            response.message.as_deref().unwrap_or("no message from backend")
        );
    }

    if response.summary().is_some_and(|s| s.has_failures()) {
        warn!("Some orders were not imported, see the details above");
    }

    Ok(())
}

/// Request body exactly as `send` would POST it
fn dry_run_body(payload: &ImportPayload) -> Result<String> {
    serde_json::to_string_pretty(payload).context("Failed to format JSON output")
}

fn print_response(response: &BulkImportResponse) {
    println!();
    if response.success {
        println!("{}", "Bulk import accepted".bright_green().bold());
    } else {
        println!("{}", "Bulk import rejected".red().bold());
    }

    if let Some(message) = &response.message {
        println!("{}", message);
    }

    if let Some(summary) = response.summary() {
        println!(
            "Total: {}  Created: {}  Failed: {}  Skipped: {}",
            summary.total.to_string().bold(),
            summary.created.to_string().green(),
            if summary.has_failures() {
                summary.failed.to_string().red()
            } else {
                summary.failed.to_string().normal()
            },
            summary.skipped.to_string().yellow()
        );
    }

    let details = response.details();
    if !details.is_empty() {
        println!();
    }
    for outcome in details {
        let status = match outcome.kind() {
            OutcomeKind::Created => outcome.status.green(),
            OutcomeKind::Failed => outcome.status.red(),
            OutcomeKind::Skipped => outcome.status.yellow(),
            OutcomeKind::Other => outcome.status.normal(),
        };
        match &outcome.message {
            Some(message) => println!("  {:<24} {}  {}", outcome.order_id, status, message.dimmed()),
            None => println!("  {:<24} {}", outcome.order_id, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::SheetArgs;
    use crate::import::OrderRecord;

    fn sheet_args(name: &str, content: &str) -> SheetArgs {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, content).unwrap();
        SheetArgs {
            file: path,
            sheet: None,
            sheet_index: None,
        }
    }

    #[test]
    fn test_dry_run_body_is_plain_json() {
        let payload = ImportPayload {
            orders: vec![OrderRecord::new("A1")],
        };
        let body = dry_run_body(&payload).unwrap();
        assert!(body.starts_with('{'));

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["orders"][0]["order_id"], "A1");
    }

    #[tokio::test]
    async fn test_dry_run_does_not_need_a_backend() {
        let args = SendArgs {
            sheet: sheet_args(
                "wms-cli-send-dry.csv",
                "ID Pesanan,Nama Produk,Jumlah\nA1,Widget,2\n,Gadget,1\n",
            ),
            dry: true,
            url: Some("http://127.0.0.1:9".into()),
            no_retry: true,
        };
        handle_send_command(args).await.unwrap();
    }

    #[tokio::test]
    async fn test_sheet_without_items_is_rejected() {
        let args = SendArgs {
            sheet: sheet_args("wms-cli-send-empty.csv", "ID Pesanan,Catatan\nA1,hello\n"),
            dry: true,
            url: None,
            no_retry: true,
        };
        let err = handle_send_command(args).await.unwrap_err();
        assert!(err.to_string().contains("No orders found"));
    }
}
