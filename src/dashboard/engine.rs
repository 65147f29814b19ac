//! The synchronization engine.
//!
//! [`Dashboard`] owns the dashboard state and drives every fetch. A refresh
//! round fans out the five list requests, waits for all of them, and only then
//! replaces the ticket snapshot and repaints every list region in a single
//! surface transaction. Detail loads are stamped with a generation so a slow
//! response can never overwrite a newer selection.

use parking_lot::Mutex;

use crate::api::DashboardApi;
use crate::display::{
    DETAIL_UNAVAILABLE, render_agents, render_assignments, render_desk_filter,
    render_desk_journey, render_desks, render_events, render_messages, render_overview,
    render_snapshot, render_ticket_count, render_tickets, render_trace, sanitize,
};
use crate::surface::{Region, Surface};
use crate::types::{TicketDetail, TicketRef, TicketStatus};

use super::state::{DashboardState, FilterControls};

/// Indicator text after a failed refresh round
pub const REFRESH_ERROR: &str = "Refresh error";

/// Result of one refresh round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All five fetches succeeded and every list region was repainted
    Applied { detail_reloaded: bool },
    /// At least one fetch failed; nothing but the indicator changed
    Failed,
}

impl RefreshOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

/// Result of one detail load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Empty reference, nothing requested
    Skipped,
    /// Not in the current ticket list, nothing requested
    Unlisted,
    Loaded,
    /// A newer load was issued while this one was in flight
    Stale,
    Failed,
}

pub struct Dashboard<C, S> {
    api: C,
    surface: Mutex<S>,
    state: Mutex<DashboardState>,
    controls: Mutex<FilterControls>,
    event_limit: u32,
}

impl<C: DashboardApi, S: Surface> Dashboard<C, S> {
    pub fn new(api: C, surface: S, ticket_limit: u32, event_limit: u32) -> Self {
        Self {
            api,
            surface: Mutex::new(surface),
            state: Mutex::new(DashboardState::new(ticket_limit)),
            controls: Mutex::new(FilterControls::default()),
            event_limit,
        }
    }

    /// Copy of the current state
    pub fn state(&self) -> DashboardState {
        self.state.lock().clone()
    }

    /// Copy of the current filter control values
    pub fn controls(&self) -> FilterControls {
        self.controls.lock().clone()
    }

    /// Inspect the surface without holding the lock past `f`
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.surface.lock())
    }

    pub fn set_query_input(&self, value: impl Into<String>) {
        self.controls.lock().query_input = value.into();
    }

    pub fn set_status_control(&self, status: Option<TicketStatus>) {
        self.controls.lock().status = status;
    }

    pub fn set_desk_control(&self, desk: Option<String>) {
        self.controls.lock().desk = desk;
    }

    /// Ticket at a zero-based row of the current list
    pub fn ticket_at(&self, index: usize) -> Option<TicketRef> {
        self.state.lock().ticket_at(index)
    }

    /// Fetch every list endpoint and repaint the dashboard.
    ///
    /// Failures are absorbed here: the indicator shows [`REFRESH_ERROR`] and
    /// the previous ticket snapshot stays in place.
    pub async fn refresh_dashboard(&self, refresh_detail: bool) -> RefreshOutcome {
        let query = self.state.lock().ticket_query();
        tracing::debug!(?query, refresh_detail, "refresh round dispatched");

        let fetched = tokio::try_join!(
            self.api.overview(),
            self.api.tickets(&query),
            self.api.desk_summary(),
            self.api.agent_load(),
            self.api.recent_events(self.event_limit),
        );
        let (overview, tickets, desks, agents, events) = match fetched {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!("dashboard refresh failed: {e}");
                let mut surface = self.surface.lock();
                surface.paint(Region::LastRefresh, REFRESH_ERROR.to_string());
                surface.flush();
                return RefreshOutcome::Failed;
            }
        };

        let desk_reset = {
            let mut state = self.state.lock();
            state.replace_tickets(tickets.tickets);
            let desk_reset = state.reconcile_desk(&desks.desks);

            let fragments = [
                (Region::Overview, render_overview(&overview)),
                (
                    Region::DeskFilter,
                    render_desk_filter(&desks.desks, state.desk.as_deref()),
                ),
                (Region::TicketCount, render_ticket_count(state.tickets.len())),
                (
                    Region::Tickets,
                    render_tickets(&state.tickets, state.selected_ticket.as_ref()),
                ),
                (Region::Desks, render_desks(&desks.desks)),
                (Region::Agents, render_agents(&agents.agents)),
                (Region::Events, render_events(&events.events)),
                (Region::LastRefresh, wall_clock()),
            ];

            let mut surface = self.surface.lock();
            for (region, content) in fragments {
                surface.paint(region, content);
            }
            surface.flush();
            desk_reset
        };

        {
            let mut controls = self.controls.lock();
            controls.desk_options = desks.desks.iter().map(|d| d.desk_code.clone()).collect();
            if desk_reset {
                tracing::debug!("desk filter no longer listed, showing all desks");
                controls.desk = None;
            }
        }

        let target = if refresh_detail {
            self.state.lock().detail_reload_target()
        } else {
            None
        };
        match target {
            Some(ticket_ref) => {
                self.load_detail(&ticket_ref, true).await;
                RefreshOutcome::Applied {
                    detail_reloaded: true,
                }
            }
            None => RefreshOutcome::Applied {
                detail_reloaded: false,
            },
        }
    }

    /// Fetch and render the detail of one ticket.
    ///
    /// With `keep_selection` unset, a successful load also makes `ticket_ref`
    /// the selection. Responses for loads superseded by a newer one are dropped.
    pub async fn load_detail(&self, ticket_ref: &TicketRef, keep_selection: bool) -> DetailOutcome {
        if ticket_ref.is_empty() {
            return DetailOutcome::Skipped;
        }

        let generation = self.state.lock().next_detail_generation();
        tracing::debug!(%ticket_ref, generation, "detail load dispatched");

        let result = self.api.ticket_detail(ticket_ref).await;

        let mut state = self.state.lock();
        if !state.is_current_detail(generation) {
            tracing::debug!(%ticket_ref, generation, "discarding stale detail response");
            return DetailOutcome::Stale;
        }

        match result {
            Ok(detail) => {
                if !keep_selection {
                    state.select(ticket_ref.clone());
                }
                let mut surface = self.surface.lock();
                for (region, content) in detail_fragments(&detail) {
                    surface.paint(region, content);
                }
                surface.flush();
                DetailOutcome::Loaded
            }
            Err(e) => {
                tracing::error!(%ticket_ref, "failed to load ticket detail: {e}");
                let mut surface = self.surface.lock();
                surface.paint(Region::DetailTitle, DETAIL_UNAVAILABLE.to_string());
                surface.flush();
                DetailOutcome::Failed
            }
        }
    }

    /// Commit the filter controls and refresh the lists, leaving detail alone.
    pub async fn on_filters_changed(&self) -> RefreshOutcome {
        let controls = self.controls.lock().clone();
        self.state.lock().apply_filters(&controls);
        self.refresh_dashboard(false).await
    }

    /// Row selection: move the highlight now, then load the ticket's detail.
    ///
    /// Only tickets in the current list can be selected.
    pub async fn select_ticket(&self, ticket_ref: TicketRef) -> DetailOutcome {
        if ticket_ref.is_empty() {
            return DetailOutcome::Skipped;
        }
        {
            let mut state = self.state.lock();
            if !state.is_listed(&ticket_ref) {
                tracing::debug!(%ticket_ref, "ignoring selection of unlisted ticket");
                return DetailOutcome::Unlisted;
            }
            state.select(ticket_ref.clone());
            let rendered = render_tickets(&state.tickets, state.selected_ticket.as_ref());
            let mut surface = self.surface.lock();
            surface.paint(Region::Tickets, rendered);
            surface.flush();
        }
        self.load_detail(&ticket_ref, false).await
    }
}

/// Fragments for every detail region, title first
pub fn detail_fragments(detail: &TicketDetail) -> [(Region, String); 6] {
    [
        (
            Region::DetailTitle,
            sanitize(detail.ticket.ticket_ref.as_str()),
        ),
        (Region::DetailSnapshot, render_snapshot(&detail.ticket)),
        (Region::DetailTrace, render_trace(&detail.routing_trace)),
        (
            Region::DetailJourney,
            render_desk_journey(&detail.desk_plan, &detail.desk_hops),
        ),
        (
            Region::DetailAssignments,
            render_assignments(&detail.assignments),
        ),
        (Region::DetailMessages, render_messages(&detail.messages)),
    ]
}

/// Local wall-clock time for the last-refresh indicator
fn wall_clock() -> String {
    jiff::Zoned::now().strftime("%H:%M:%S").to_string()
}
