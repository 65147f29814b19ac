//! Renderers for the list-level dashboard regions.
//!
//! Every function here is pure: payload plus selection in, text fragment out.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::types::{AgentLoad, DeskSummary, Overview, RecentEvent, TicketRef, TicketSummary};

use super::formatters::{
    HOT_LOAD_PCT, fmt_hours, fmt_minutes, fmt_timestamp, labelled, load_bar, load_pct, muted,
    or_dash, sanitize, status_badge,
};

/// Agents shown in the load panel
pub const MAX_AGENTS: usize = 12;
/// Events shown in the activity feed
pub const MAX_EVENTS: usize = 15;

pub const EMPTY_TICKETS: &str = "No tickets match the current filter.";
pub const EMPTY_DESKS: &str = "No desk data.";
pub const EMPTY_AGENTS: &str = "No active agents.";
pub const EMPTY_EVENTS: &str = "No recent exchanges.";

/// Render the KPI block
pub fn render_overview(data: &Overview) -> String {
    let rows = [
        ("Total tickets", data.total_tickets.to_string()),
        ("Active", data.active_tickets.to_string()),
        (
            "Automatable",
            format!(
                "{}% ({} automatable tickets)",
                data.automatable_rate_pct, data.automatable_tickets
            ),
        ),
        ("Multi-desk", data.multi_desk_tickets.to_string()),
        ("Avg resolution", fmt_hours(data.avg_resolution_hours)),
        ("Active > 24h", data.active_over_24h.to_string()),
        ("Inbound (15m)", data.inbound_last_15m.to_string()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{label:<16}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `N records` counter above the ticket table
pub fn render_ticket_count(count: usize) -> String {
    format!("{count} records")
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Ticket")]
    ticket: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Auto/Multi")]
    flags: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Intent")]
    intent: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Desk")]
    desk: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Last event")]
    last_event: String,
}

fn flag(value: bool) -> &'static str {
    if value { "YES" } else { "NO" }
}

fn ticket_row(index: usize, ticket: &TicketSummary, selected: Option<&TicketRef>) -> TicketRow {
    let marker = if selected == Some(&ticket.ticket_ref) {
        ">"
    } else {
        " "
    };
    let owner = ticket
        .owner_agent_name
        .as_deref()
        .or(ticket.owner_agent_code.as_deref())
        .filter(|o| !o.trim().is_empty())
        .map(sanitize)
        .unwrap_or_else(|| "Unassigned".to_string());

    TicketRow {
        index: format!("{marker}{}", index + 1),
        ticket: format!(
            "{} {}",
            sanitize(ticket.ticket_ref.as_str()),
            or_dash(ticket.priority.as_deref())
        ),
        status: sanitize(&ticket.status),
        flags: format!(
            "{}/{}",
            flag(ticket.automatable),
            flag(ticket.requires_multi_desk)
        ),
        client: or_dash(ticket.client_name.as_deref()),
        intent: or_dash(ticket.intent_code.as_deref()),
        owner,
        desk: labelled(
            ticket.current_desk_name.as_deref(),
            ticket.current_desk_code.as_deref(),
        ),
        age: fmt_minutes(ticket.created_age_min),
        last_event: format!(
            "{} ({})",
            fmt_minutes(ticket.last_event_age_min),
            fmt_timestamp(ticket.last_event_at.as_deref())
        ),
    }
}

/// Render the ticket table, marking the selected row with `>`
pub fn render_tickets(tickets: &[TicketSummary], selected: Option<&TicketRef>) -> String {
    if tickets.is_empty() {
        return EMPTY_TICKETS.to_string();
    }
    let rows: Vec<TicketRow> = tickets
        .iter()
        .enumerate()
        .map(|(i, t)| ticket_row(i, t, selected))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Render the desk filter options; the active one is starred
pub fn render_desk_filter(desks: &[DeskSummary], current: Option<&str>) -> String {
    let mut options = Vec::with_capacity(desks.len() + 1);
    let star = |active: bool| if active { "*" } else { " " };
    options.push(format!("{} All desks", star(current.is_none())));
    for desk in desks {
        options.push(format!(
            "{} {}",
            star(current == Some(desk.desk_code.as_str())),
            labelled(Some(&desk.desk_name), Some(&desk.desk_code))
        ));
    }
    options.join("\n")
}

/// Render per-desk statistics
pub fn render_desks(desks: &[DeskSummary]) -> String {
    if desks.is_empty() {
        return EMPTY_DESKS.to_string();
    }
    desks
        .iter()
        .map(|d| {
            format!(
                "{}  [{} active]\n  {}\n  Escalated: {} | Multi-desk active: {} | Agents: {}\n  Avg active age: {:.1}h",
                labelled(Some(&d.desk_name), Some(&d.desk_code)),
                d.active_tickets,
                muted(&or_dash(d.specialty.as_deref())),
                d.escalated_tickets,
                d.active_multi_desk,
                d.active_agents,
                d.avg_active_age_hours,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the agent load panel: active agents only, capped at [`MAX_AGENTS`]
pub fn render_agents(agents: &[AgentLoad]) -> String {
    let active: Vec<&AgentLoad> = agents
        .iter()
        .filter(|a| a.is_active)
        .take(MAX_AGENTS)
        .collect();
    if active.is_empty() {
        return EMPTY_AGENTS.to_string();
    }
    active
        .iter()
        .map(|a| {
            let pct = load_pct(a.load_ratio);
            let hot = if pct >= HOT_LOAD_PCT { " !" } else { "" };
            format!(
                "{}  {}% load{}\n  {} | {}/{} open\n  {}",
                labelled(Some(&a.full_name), Some(&a.agent_code)),
                pct,
                hot,
                labelled(Some(&a.desk_name), Some(&a.desk_code)),
                a.open_ticket_count,
                a.max_open_tickets,
                load_bar(pct, 20),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the recent activity feed, capped at [`MAX_EVENTS`]
pub fn render_events(events: &[RecentEvent]) -> String {
    if events.is_empty() {
        return EMPTY_EVENTS.to_string();
    }
    events
        .iter()
        .take(MAX_EVENTS)
        .map(|e| {
            format!(
                "{} {} {}\n  {}\n  {}",
                sanitize(e.ticket_ref.as_str()),
                status_badge(&e.ticket_status),
                e.direction,
                or_dash(e.subject.as_deref()),
                muted(&fmt_timestamp(e.sent_at.as_deref())),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
