//! `config` command: print the effective configuration

use anyhow::Result;
use colored::*;

use crate::config::Config;

pub fn handle_config_command() -> Result<()> {
    let config = Config::load()?;

    match Config::default_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display().to_string().cyan()),
        Some(path) => println!(
            "Config file: {} {}",
            path.display().to_string().cyan(),
            "(not found, using defaults)".dimmed()
        ),
        None => println!("Config file: {}", "(no config directory)".dimmed()),
    }

    println!();
    println!("Endpoint:   {}", config.api.endpoint().bright_green());
    println!("Token:      {}", mask_token(config.api.token.as_deref()));
    println!("Timeout:    {}s", config.api.timeout_secs);
    if config.retry.enabled {
        println!(
            "Retry:      {} attempts, {}ms base delay (x{}), max {}ms{}",
            config.retry.max_attempts,
            config.retry.base_delay_ms,
            config.retry.backoff_multiplier,
            config.retry.max_delay_ms,
            if config.retry.jitter { ", jitter" } else { "" }
        );
    } else {
        println!("Retry:      {}", "disabled".yellow());
    }

    Ok(())
}

fn mask_token(token: Option<&str>) -> String {
    match token {
        None => "(none)".dimmed().to_string(),
        Some(t) if t.chars().count() <= 8 => "********".to_string(),
        Some(t) => {
            let tail: String = t.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{}", tail)
        }
    }
}
