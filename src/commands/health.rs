use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::api::{DashboardApi, HttpClient};
use crate::config::Config;
use crate::error::Result;

/// Query the backend health endpoint
pub async fn cmd_health(config: &Config, output_json: bool) -> Result<()> {
    let client = HttpClient::from_config(config)?;
    let health = client.health().await?;

    let status = if health.status.eq_ignore_ascii_case("ok") {
        health.status.green().to_string()
    } else {
        health.status.yellow().to_string()
    };
    let mut text = format!("Backend {} is {}", client.base_url(), status);
    if let Some(db_path) = &health.db_path {
        text.push_str(&format!("\n{}", format!("Database: {db_path}").dimmed()));
    }

    CommandOutput::new(json!({
        "base_url": client.base_url().as_str(),
        "status": health.status,
        "db_path": health.db_path,
    }))
    .with_text(text)
    .print(output_json)
}
