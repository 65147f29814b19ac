use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enum_display_fromstr;
use crate::error::DeskwatchError;

pub const CONFIG_DIR: &str = ".deskwatch";

/// Opaque ticket identifier; the join key between the list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketRef(String);

impl TicketRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TicketRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TicketRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    WaitingClient,
    Escalated,
    Resolved,
    Closed,
}

enum_display_fromstr!(
    TicketStatus,
    DeskwatchError::InvalidStatus,
    {
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        WaitingClient => "WAITING_CLIENT",
        Escalated => "ESCALATED",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
);

impl TicketStatus {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            TicketStatus::Open
                | TicketStatus::InProgress
                | TicketStatus::WaitingClient
                | TicketStatus::Escalated
        )
    }
}

pub const VALID_STATUSES: &[&str] = &[
    "OPEN",
    "IN_PROGRESS",
    "WAITING_CLIENT",
    "ESCALATED",
    "RESOLVED",
    "CLOSED",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "INBOUND"),
            Direction::Outbound => write!(f, "OUTBOUND"),
        }
    }
}

/// Aggregate KPIs from `/api/overview`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_tickets: u64,
    pub active_tickets: u64,
    #[serde(default)]
    pub resolved_tickets: u64,
    #[serde(default)]
    pub closed_tickets: u64,
    pub automatable_tickets: u64,
    pub automatable_rate_pct: f64,
    pub multi_desk_tickets: u64,
    pub active_over_24h: u64,
    #[serde(default)]
    pub avg_first_response_min: f64,
    pub avg_resolution_hours: Option<f64>,
    pub inbound_last_15m: u64,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// Read-only projection of a ticket as listed by `/api/tickets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_ref: TicketRef,
    pub status: String,
    pub priority: Option<String>,
    #[serde(default)]
    pub automatable: bool,
    #[serde(default)]
    pub requires_multi_desk: bool,
    pub requester_email: Option<String>,
    pub subject: Option<String>,
    pub created_at: Option<String>,
    pub created_age_min: Option<i64>,
    pub last_event_at: Option<String>,
    pub last_event_age_min: Option<i64>,
    pub client_name: Option<String>,
    pub intent_code: Option<String>,
    pub intent_name: Option<String>,
    pub primary_desk_code: Option<String>,
    pub primary_desk_name: Option<String>,
    pub current_desk_code: Option<String>,
    pub current_desk_name: Option<String>,
    pub owner_agent_code: Option<String>,
    pub owner_agent_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub tickets: Vec<TicketSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskSummary {
    pub desk_code: String,
    pub desk_name: String,
    pub specialty: Option<String>,
    #[serde(default)]
    pub total_tickets: u64,
    #[serde(default)]
    pub active_tickets: u64,
    #[serde(default)]
    pub escalated_tickets: u64,
    #[serde(default)]
    pub active_multi_desk: u64,
    #[serde(default)]
    pub avg_active_age_hours: f64,
    #[serde(default)]
    pub active_agents: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskList {
    #[serde(default)]
    pub desks: Vec<DeskSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLoad {
    pub agent_code: String,
    pub full_name: String,
    pub desk_code: String,
    pub desk_name: String,
    pub specialty: Option<String>,
    #[serde(default)]
    pub open_ticket_count: u64,
    #[serde(default)]
    pub max_open_tickets: u64,
    #[serde(default)]
    pub available_slots: i64,
    #[serde(default)]
    pub load_ratio: f64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentList {
    #[serde(default)]
    pub agents: Vec<AgentLoad>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEvent {
    pub sent_at: Option<String>,
    pub direction: Direction,
    pub sender_email: Option<String>,
    pub recipient_email: Option<String>,
    pub subject: Option<String>,
    pub delivery_status: Option<String>,
    pub ticket_ref: TicketRef,
    pub ticket_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub events: Vec<RecentEvent>,
}

/// Snapshot fields of a single ticket from `/api/tickets/{ref}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    pub ticket_ref: TicketRef,
    pub status: String,
    pub priority: Option<String>,
    #[serde(default)]
    pub automatable: bool,
    #[serde(default)]
    pub requires_multi_desk: bool,
    pub requester_email: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub channel: Option<String>,
    pub created_at: Option<String>,
    pub first_response_at: Option<String>,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
    pub client_code: Option<String>,
    pub client_name: Option<String>,
    pub intent_code: Option<String>,
    pub intent_name: Option<String>,
    pub primary_desk_code: Option<String>,
    pub primary_desk_name: Option<String>,
    pub current_desk_code: Option<String>,
    pub current_desk_name: Option<String>,
    pub owner_agent_code: Option<String>,
    pub owner_agent_name: Option<String>,
    pub owner_agent_email: Option<String>,
    pub age_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_seq: u32,
    pub node_name: String,
    pub decision: String,
    pub rationale: Option<String>,
    pub actor_type: String,
    pub agent_code: Option<String>,
    pub agent_name: Option<String>,
    pub created_at: Option<String>,
}

/// Forward-looking desk routing decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_seq: u32,
    pub desk_code: String,
    pub desk_name: String,
    pub step_reason: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Recorded move of a ticket between desks. `from_desk_*` is empty on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskHop {
    pub hop_seq: u32,
    pub from_desk_code: Option<String>,
    pub from_desk_name: Option<String>,
    pub to_desk_code: String,
    pub to_desk_name: String,
    pub hop_reason: Option<String>,
    pub hopped_at: Option<String>,
    pub agent_code: Option<String>,
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_role: String,
    pub assignment_reason: Option<String>,
    pub assigned_at: Option<String>,
    pub released_at: Option<String>,
    pub agent_code: String,
    pub agent_name: String,
    pub agent_email: Option<String>,
    pub desk_code: String,
    pub desk_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub direction: Direction,
    pub sender_email: Option<String>,
    pub recipient_email: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sent_at: Option<String>,
    #[serde(default)]
    pub is_automated: bool,
    pub delivery_status: Option<String>,
}

/// Full ticket trace. Always replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetail {
    pub ticket: TicketSnapshot,
    #[serde(default)]
    pub routing_trace: Vec<TraceStep>,
    #[serde(default)]
    pub desk_plan: Vec<PlanStep>,
    #[serde(default)]
    pub desk_hops: Vec<DeskHop>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub db_path: Option<String>,
}
