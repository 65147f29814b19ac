//! Render targets for dashboard fragments.
//!
//! The engine never formats a screen itself: it paints one text fragment per
//! [`Region`] and then flushes, so a surface only ever shows regions painted
//! within complete refresh rounds.

pub mod memory;
pub mod terminal;

use std::collections::BTreeMap;
use std::fmt;

pub use memory::MemorySurface;
pub use terminal::TerminalSurface;

use crate::display::{heading, muted};

/// Placeholder shown in the detail pane before any ticket is opened
pub const DETAIL_EMPTY: &str = "Select a ticket to inspect its trace.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    LastRefresh,
    Overview,
    DeskFilter,
    TicketCount,
    Tickets,
    Desks,
    Agents,
    Events,
    DetailTitle,
    DetailSnapshot,
    DetailTrace,
    DetailJourney,
    DetailAssignments,
    DetailMessages,
}

impl Region {
    /// Regions written by a successful refresh round
    pub const LIST: [Region; 7] = [
        Region::Overview,
        Region::DeskFilter,
        Region::TicketCount,
        Region::Tickets,
        Region::Desks,
        Region::Agents,
        Region::Events,
    ];

    /// Regions written by a successful detail load
    pub const DETAIL: [Region; 6] = [
        Region::DetailTitle,
        Region::DetailSnapshot,
        Region::DetailTrace,
        Region::DetailJourney,
        Region::DetailAssignments,
        Region::DetailMessages,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Region::LastRefresh => "Last refresh",
            Region::Overview => "Overview",
            Region::DeskFilter => "Desk filter",
            Region::TicketCount => "Ticket count",
            Region::Tickets => "Tickets",
            Region::Desks => "Desks",
            Region::Agents => "Agent load",
            Region::Events => "Recent exchanges",
            Region::DetailTitle => "Ticket",
            Region::DetailSnapshot => "Snapshot",
            Region::DetailTrace => "Routing trace",
            Region::DetailJourney => "Desk journey",
            Region::DetailAssignments => "Assignments",
            Region::DetailMessages => "Messages",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Destination for rendered fragments
pub trait Surface: Send {
    /// Replace the content of one region
    fn paint(&mut self, region: Region, content: String);

    /// Make everything painted so far visible
    fn flush(&mut self);
}

/// Lay out a full dashboard screen from the latest fragment of each region.
pub fn compose_screen(regions: &BTreeMap<Region, String>) -> String {
    let get = |region: Region| regions.get(&region).map(String::as_str);
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        heading("deskwatch"),
        muted(&format!(
            "last refresh: {}",
            get(Region::LastRefresh).unwrap_or("never")
        ))
    ));

    let section = |out: &mut String, title: &str, body: Option<&str>| {
        out.push('\n');
        out.push_str(&heading(&format!("== {title} ==")));
        out.push('\n');
        out.push_str(body.unwrap_or("-"));
        out.push('\n');
    };

    section(&mut out, Region::Overview.title(), get(Region::Overview));
    section(&mut out, Region::DeskFilter.title(), get(Region::DeskFilter));

    let tickets_title = match get(Region::TicketCount) {
        Some(count) => format!("Tickets ({count})"),
        None => "Tickets".to_string(),
    };
    section(&mut out, &tickets_title, get(Region::Tickets));
    section(&mut out, Region::Desks.title(), get(Region::Desks));
    section(&mut out, Region::Agents.title(), get(Region::Agents));
    section(&mut out, Region::Events.title(), get(Region::Events));

    match get(Region::DetailTitle) {
        None => section(&mut out, "Detail", Some(DETAIL_EMPTY)),
        Some(title) => {
            out.push('\n');
            out.push_str(&heading(&format!("== Detail: {title} ==")));
            out.push('\n');
            for region in &Region::DETAIL[1..] {
                if let Some(body) = get(*region) {
                    out.push_str(&format!("-- {} --\n{}\n", region.title(), body));
                }
            }
        }
    }

    out
}
