use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{Config, URL_ENV};
use crate::error::Result;

/// Show the effective configuration
pub fn cmd_config_show(config: &Config, config_path: &Path, output_json: bool) -> Result<()> {
    let file_present = config_path.exists();
    let url_from_env = std::env::var(URL_ENV)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);

    let json_output = json!({
        "base_url": config.base_url,
        "refresh_interval_ms": config.refresh_interval_ms,
        "ticket_limit": config.ticket_limit,
        "event_limit": config.event_limit,
        "search_debounce_ms": config.search_debounce_ms,
        "request_timeout": config.request_timeout,
        "config_file": config_path.to_string_lossy(),
        "config_file_present": file_present,
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "backend".cyan()));
    text_output.push_str(&format!("  base_url: {}", config.base_url));
    if url_from_env {
        text_output.push_str(&format!(" {}", format!("(from {URL_ENV})").dimmed()));
    }
    text_output.push('\n');
    text_output.push_str(&format!("  request_timeout: {}s\n", config.request_timeout));
    text_output.push('\n');

    text_output.push_str(&format!("{}:\n", "refresh".cyan()));
    text_output.push_str(&format!(
        "  refresh_interval_ms: {}\n",
        config.refresh_interval_ms
    ));
    text_output.push_str(&format!(
        "  search_debounce_ms: {}\n",
        config.search_debounce_ms
    ));
    text_output.push('\n');

    text_output.push_str(&format!("{}:\n", "limits".cyan()));
    text_output.push_str(&format!("  ticket_limit: {}\n", config.ticket_limit));
    text_output.push_str(&format!("  event_limit: {}\n", config.event_limit));
    text_output.push('\n');

    let source = if file_present {
        format!("Config file: {}", config_path.display())
    } else {
        format!("Config file: {} (not found, using defaults)", config_path.display())
    };
    text_output.push_str(&format!("{}", source.dimmed()));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}
