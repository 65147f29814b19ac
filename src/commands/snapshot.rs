use serde_json::{Map, Value, json};

use super::{CommandOutput, apply_filter_args};
use crate::api::HttpClient;
use crate::cli::FilterArgs;
use crate::config::Config;
use crate::dashboard::{Dashboard, DetailOutcome};
use crate::error::{DeskwatchError, Result};
use crate::surface::MemorySurface;
use crate::types::TicketRef;

/// Run one headless refresh round and print the resulting dashboard
pub async fn cmd_snapshot(
    config: &Config,
    filters: &FilterArgs,
    ticket: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let client = HttpClient::from_config(config)?;
    let dashboard = Dashboard::new(
        client,
        MemorySurface::new(),
        config.ticket_limit,
        config.event_limit,
    );
    apply_filter_args(&dashboard, filters);

    if !dashboard.on_filters_changed().await.is_applied() {
        return Err(DeskwatchError::Other(format!(
            "dashboard refresh against {} failed",
            config.base_url
        )));
    }

    if let Some(ticket_ref) = ticket {
        match dashboard.select_ticket(TicketRef::from(ticket_ref)).await {
            DetailOutcome::Unlisted => {
                return Err(DeskwatchError::Other(format!(
                    "ticket {ticket_ref} is not in the current list"
                )));
            }
            DetailOutcome::Failed => {
                return Err(DeskwatchError::Other(format!(
                    "failed to load detail for {ticket_ref}"
                )));
            }
            _ => {}
        }
    }

    let state = dashboard.state();
    let regions: Map<String, Value> = dashboard.with_surface(|surface| {
        surface
            .regions()
            .iter()
            .map(|(region, content)| (format!("{region:?}"), Value::String(content.clone())))
            .collect()
    });
    let screen = dashboard.with_surface(MemorySurface::screen);

    CommandOutput::new(json!({
        "filters": {
            "status": state.status.map(|s| s.to_string()),
            "desk": state.desk,
            "query": state.query,
        },
        "selected_ticket": state.selected_ticket,
        "tickets": state.tickets,
        "regions": regions,
    }))
    .with_text(screen)
    .print(output_json)
}
