//! Dashboard state and the filter controls that feed it.
//!
//! Everything here is synchronous and side-effect free; the engine wraps these
//! types in mutexes and decides when to call the update methods.

use crate::api::TicketQuery;
use crate::types::{DeskSummary, TicketRef, TicketStatus, TicketSummary};

/// Current values of the filter inputs, not yet committed to the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterControls {
    /// Raw free-text input, untrimmed
    pub query_input: String,
    pub status: Option<TicketStatus>,
    pub desk: Option<String>,
    /// Desk codes offered by the desk selector, rebuilt on every refresh
    pub desk_options: Vec<String>,
}

/// Committed filters, selection and the latest ticket snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub query: String,
    pub status: Option<TicketStatus>,
    pub desk: Option<String>,
    pub selected_ticket: Option<TicketRef>,
    pub tickets: Vec<TicketSummary>,
    detail_generation: u64,
    ticket_limit: u32,
}

impl DashboardState {
    /// Empty filters, no selection
    pub fn new(ticket_limit: u32) -> Self {
        Self {
            query: String::new(),
            status: None,
            desk: None,
            selected_ticket: None,
            tickets: Vec::new(),
            detail_generation: 0,
            ticket_limit,
        }
    }

    /// Commit the control values as the active filters.
    pub fn apply_filters(&mut self, controls: &FilterControls) {
        self.query = controls.query_input.trim().to_string();
        self.status = controls.status;
        self.desk = controls
            .desk
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
    }

    /// Ticket-list request for the filters as they are right now
    pub fn ticket_query(&self) -> TicketQuery {
        TicketQuery {
            limit: self.ticket_limit,
            status: self.status,
            desk: self.desk.clone(),
            query: Some(self.query.clone()).filter(|q| !q.is_empty()),
        }
    }

    pub fn replace_tickets(&mut self, tickets: Vec<TicketSummary>) {
        self.tickets = tickets;
    }

    pub fn select(&mut self, ticket_ref: TicketRef) {
        self.selected_ticket = Some(ticket_ref);
    }

    pub fn is_listed(&self, ticket_ref: &TicketRef) -> bool {
        self.tickets.iter().any(|t| &t.ticket_ref == ticket_ref)
    }

    /// The selection, if it should be reloaded after a refresh.
    ///
    /// A selection that dropped out of the current list is stale and yields
    /// `None`; it is kept, not cleared.
    pub fn detail_reload_target(&self) -> Option<TicketRef> {
        self.selected_ticket
            .as_ref()
            .filter(|r| self.is_listed(r))
            .cloned()
    }

    /// Ticket at a zero-based position of the current list
    pub fn ticket_at(&self, index: usize) -> Option<TicketRef> {
        self.tickets.get(index).map(|t| t.ticket_ref.clone())
    }

    /// Drop the desk filter when its desk is no longer offered.
    ///
    /// Returns true if the filter was reset.
    pub fn reconcile_desk(&mut self, desks: &[DeskSummary]) -> bool {
        match self.desk.as_deref() {
            Some(code) if !desks.iter().any(|d| d.desk_code == code) => {
                self.desk = None;
                true
            }
            _ => false,
        }
    }

    /// Start a new detail load; any load started earlier becomes stale.
    pub fn next_detail_generation(&mut self) -> u64 {
        self.detail_generation += 1;
        self.detail_generation
    }

    pub fn is_current_detail(&self, generation: u64) -> bool {
        self.detail_generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(r: &str) -> TicketSummary {
        serde_json::from_value(serde_json::json!({
            "ticket_ref": r,
            "status": "OPEN",
        }))
        .unwrap()
    }

    fn desk(code: &str) -> DeskSummary {
        serde_json::from_value(serde_json::json!({
            "desk_code": code,
            "desk_name": format!("{code} Desk"),
        }))
        .unwrap()
    }

    #[test]
    fn test_new_state_is_unfiltered() {
        let state = DashboardState::new(300);
        assert_eq!(state.ticket_query(), TicketQuery::new(300));
        assert!(state.selected_ticket.is_none());
        assert!(state.tickets.is_empty());
    }

    #[test]
    fn test_apply_filters_trims_and_normalizes() {
        let mut state = DashboardState::new(300);
        state.apply_filters(&FilterControls {
            query_input: "  acme wire ".to_string(),
            status: Some(TicketStatus::Escalated),
            desk: Some("  ".to_string()),
            desk_options: vec![],
        });
        assert_eq!(state.query, "acme wire");
        assert_eq!(state.status, Some(TicketStatus::Escalated));
        assert_eq!(state.desk, None);

        let query = state.ticket_query();
        assert_eq!(query.query.as_deref(), Some("acme wire"));
        assert_eq!(query.desk, None);
    }

    #[test]
    fn test_empty_query_is_omitted() {
        let mut state = DashboardState::new(50);
        state.apply_filters(&FilterControls {
            query_input: "   ".to_string(),
            ..FilterControls::default()
        });
        assert_eq!(state.ticket_query().query, None);
    }

    #[test]
    fn test_reload_target_requires_listed_selection() {
        let mut state = DashboardState::new(300);
        assert_eq!(state.detail_reload_target(), None);

        state.replace_tickets(vec![summary("T1"), summary("T2")]);
        state.select(TicketRef::from("T2"));
        assert_eq!(state.detail_reload_target(), Some(TicketRef::from("T2")));

        state.replace_tickets(vec![summary("T1")]);
        assert_eq!(state.detail_reload_target(), None);
        assert_eq!(state.selected_ticket, Some(TicketRef::from("T2")));
    }

    #[test]
    fn test_ticket_at() {
        let mut state = DashboardState::new(300);
        state.replace_tickets(vec![summary("T1"), summary("T2")]);
        assert_eq!(state.ticket_at(1), Some(TicketRef::from("T2")));
        assert_eq!(state.ticket_at(2), None);
    }

    #[test]
    fn test_reconcile_desk() {
        let mut state = DashboardState::new(300);
        assert!(!state.reconcile_desk(&[]));

        state.desk = Some("FX".to_string());
        assert!(!state.reconcile_desk(&[desk("FX"), desk("OPS")]));
        assert_eq!(state.desk.as_deref(), Some("FX"));

        assert!(state.reconcile_desk(&[desk("OPS")]));
        assert_eq!(state.desk, None);
    }

    #[test]
    fn test_detail_generations() {
        let mut state = DashboardState::new(300);
        let first = state.next_detail_generation();
        assert!(state.is_current_detail(first));
        let second = state.next_detail_generation();
        assert!(!state.is_current_detail(first));
        assert!(state.is_current_detail(second));
    }
}
