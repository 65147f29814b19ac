use crate::api::{DashboardApi, HttpClient};
use crate::config::Config;
use crate::dashboard::detail_fragments;
use crate::display::heading;
use crate::error::Result;
use crate::surface::Region;
use crate::types::TicketRef;

use super::CommandOutput;

/// Print the detail of one ticket
pub async fn cmd_show(config: &Config, ticket_ref: &str, output_json: bool) -> Result<()> {
    let client = HttpClient::from_config(config)?;
    let detail = client.ticket_detail(&TicketRef::from(ticket_ref)).await?;

    let mut sections = Vec::new();
    for (region, content) in detail_fragments(&detail) {
        if region == Region::DetailTitle {
            sections.push(heading(&content));
        } else {
            sections.push(format!("\n{}\n{}", heading(region.title()), content));
        }
    }

    CommandOutput::new(serde_json::to_value(&detail)?)
        .with_text(sections.join("\n"))
        .print(output_json)
}
