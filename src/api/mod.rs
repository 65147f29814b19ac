//! Read-only client for the dashboard backend.
//!
//! `DashboardApi` is the seam between the synchronization engine and the
//! network: the engine only ever talks to this trait, so tests drive it with
//! scripted fakes while the binary uses [`HttpClient`].

pub mod http;

use crate::error::Result;
use crate::types::{
    AgentList, DeskList, EventList, Health, Overview, TicketDetail, TicketList, TicketRef,
    TicketStatus,
};

pub use http::HttpClient;

pub const OVERVIEW_PATH: &str = "/api/overview";
pub const TICKETS_PATH: &str = "/api/tickets";
pub const DESKS_PATH: &str = "/api/desks/summary";
pub const AGENTS_PATH: &str = "/api/agents/load";
pub const EVENTS_PATH: &str = "/api/events/recent";
pub const HEALTH_PATH: &str = "/health";

/// Parameters of a ticket-list request, captured when the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    pub limit: u32,
    pub status: Option<TicketStatus>,
    pub desk: Option<String>,
    pub query: Option<String>,
}

impl TicketQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            status: None,
            desk: None,
            query: None,
        }
    }

    /// Query pairs in wire order. Unset filters are omitted entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(desk) = self.desk.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("desk", desk.to_string()));
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("query", query.to_string()));
        }
        pairs
    }
}

/// Common interface for dashboard backends
pub trait DashboardApi: Send + Sync {
    /// Aggregate KPIs
    fn overview(&self) -> impl std::future::Future<Output = Result<Overview>> + Send;

    /// Filtered ticket list
    fn tickets(
        &self,
        query: &TicketQuery,
    ) -> impl std::future::Future<Output = Result<TicketList>> + Send;

    /// Per-desk statistics
    fn desk_summary(&self) -> impl std::future::Future<Output = Result<DeskList>> + Send;

    /// Per-agent open-ticket load
    fn agent_load(&self) -> impl std::future::Future<Output = Result<AgentList>> + Send;

    /// Most recent message events
    fn recent_events(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<EventList>> + Send;

    /// Full trace of one ticket
    fn ticket_detail(
        &self,
        ticket_ref: &TicketRef,
    ) -> impl std::future::Future<Output = Result<TicketDetail>> + Send;

    /// Backend liveness
    fn health(&self) -> impl std::future::Future<Output = Result<Health>> + Send;
}
