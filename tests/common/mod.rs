#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use deskwatch::api::{DashboardApi, TicketQuery};
use deskwatch::error::{DeskwatchError, Result};
use deskwatch::types::{
    AgentList, AgentLoad, DeskList, DeskSummary, EventList, Health, Overview, RecentEvent,
    TicketDetail, TicketList, TicketRef, TicketSummary,
};
use deskwatch::{Dashboard, MemorySurface};

/// Helper struct to run deskwatch commands in an isolated temp directory
pub struct DeskwatchTest {
    pub temp_dir: TempDir,
}

impl DeskwatchTest {
    pub fn new() -> Self {
        DeskwatchTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_deskwatch"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("DESKWATCH_URL")
            .env_remove("DESKWATCH_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute deskwatch command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected {args:?} to fail\nstdout: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".deskwatch");
        fs::create_dir_all(&dir).expect("Failed to create config dir");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config");
    }
}

pub const OVERVIEW: &str = "overview";
pub const TICKETS: &str = "tickets";
pub const DESKS: &str = "desks";
pub const AGENTS: &str = "agents";
pub const EVENTS: &str = "events";

#[derive(Default)]
struct FakeState {
    tickets: Vec<TicketSummary>,
    desks: Vec<DeskSummary>,
    agents: Vec<AgentLoad>,
    events: Vec<RecentEvent>,
    failing: HashSet<&'static str>,
    failing_details: HashSet<TicketRef>,
    detail_gates: HashMap<TicketRef, Arc<Semaphore>>,
    round_gate: Option<Arc<Semaphore>>,
    next_round_gates: VecDeque<Arc<Semaphore>>,
    reported_count: Option<usize>,
    ticket_queries: Vec<TicketQuery>,
    detail_requests: Vec<TicketRef>,
}

/// Scripted in-memory backend.
///
/// Tickets are filtered by status and desk like the real backend. Endpoints
/// can be made to fail, and responses can be held back behind gates to force
/// a particular interleaving.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
    rounds: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tickets(&self, tickets: Vec<TicketSummary>) {
        self.state.lock().tickets = tickets;
    }

    pub fn set_desks(&self, desks: Vec<DeskSummary>) {
        self.state.lock().desks = desks;
    }

    pub fn set_agents(&self, agents: Vec<AgentLoad>) {
        self.state.lock().agents = agents;
    }

    pub fn set_events(&self, events: Vec<RecentEvent>) {
        self.state.lock().events = events;
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.state.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.state.lock().failing.remove(endpoint);
    }

    pub fn fail_detail(&self, ticket_ref: &str) {
        self.state
            .lock()
            .failing_details
            .insert(TicketRef::from(ticket_ref));
    }

    /// Hold detail responses for `ticket_ref` until the returned gate is opened
    pub fn gate_detail(&self, ticket_ref: &str) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.state
            .lock()
            .detail_gates
            .insert(TicketRef::from(ticket_ref), Arc::clone(&semaphore));
        Gate(semaphore)
    }

    /// Hold every overview response until the returned gate is opened
    pub fn gate_rounds(&self) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.state.lock().round_gate = Some(Arc::clone(&semaphore));
        Gate(semaphore)
    }

    /// Hold only the next dispatched round until the returned gate is opened.
    /// Successive calls gate successive rounds, so they can be released in
    /// any order.
    pub fn gate_next_round(&self) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.state
            .lock()
            .next_round_gates
            .push_back(Arc::clone(&semaphore));
        Gate(semaphore)
    }

    /// Report `count` in ticket-list payloads regardless of the rows sent
    pub fn report_count(&self, count: usize) {
        self.state.lock().reported_count = Some(count);
    }

    pub fn ticket_queries(&self) -> Vec<TicketQuery> {
        self.state.lock().ticket_queries.clone()
    }

    pub fn detail_requests(&self) -> Vec<TicketRef> {
        self.state.lock().detail_requests.clone()
    }

    /// Number of overview requests served, i.e. refresh rounds dispatched
    pub fn rounds(&self) -> usize {
        self.rounds.load(Ordering::SeqCst)
    }

    fn check(&self, endpoint: &'static str) -> Result<()> {
        if self.state.lock().failing.contains(endpoint) {
            return Err(DeskwatchError::Status {
                status: 500,
                path: format!("/api/{endpoint}"),
            });
        }
        Ok(())
    }
}

/// Releases one held response per `open`
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn open(&self) {
        self.0.add_permits(1);
    }

    /// Let every current and future response through
    pub fn open_all(&self) {
        self.0.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.expect("gate closed").forget();
    }
}

impl DashboardApi for FakeApi {
    async fn overview(&self) -> Result<Overview> {
        self.rounds.fetch_add(1, Ordering::SeqCst);
        let gate = {
            let mut state = self.state.lock();
            state
                .round_gate
                .clone()
                .or_else(|| state.next_round_gates.pop_front())
        };
        pass(gate).await;
        self.check(OVERVIEW)?;
        let state = self.state.lock();
        Ok(Overview {
            total_tickets: state.tickets.len() as u64,
            active_tickets: state.tickets.len() as u64,
            ..Overview::default()
        })
    }

    async fn tickets(&self, query: &TicketQuery) -> Result<TicketList> {
        self.state.lock().ticket_queries.push(query.clone());
        self.check(TICKETS)?;
        let state = self.state.lock();
        let tickets: Vec<TicketSummary> = state
            .tickets
            .iter()
            .filter(|t| query.status.is_none_or(|s| t.status == s.to_string()))
            .filter(|t| {
                query
                    .desk
                    .as_deref()
                    .is_none_or(|d| t.current_desk_code.as_deref() == Some(d))
            })
            .filter(|t| {
                query.query.as_deref().is_none_or(|q| {
                    t.subject
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&q.to_lowercase()))
                })
            })
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(TicketList {
            count: state.reported_count.unwrap_or(tickets.len()),
            tickets,
        })
    }

    async fn desk_summary(&self) -> Result<DeskList> {
        self.check(DESKS)?;
        Ok(DeskList {
            desks: self.state.lock().desks.clone(),
        })
    }

    async fn agent_load(&self) -> Result<AgentList> {
        self.check(AGENTS)?;
        Ok(AgentList {
            agents: self.state.lock().agents.clone(),
        })
    }

    async fn recent_events(&self, limit: u32) -> Result<EventList> {
        self.check(EVENTS)?;
        Ok(EventList {
            events: self
                .state
                .lock()
                .events
                .iter()
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn ticket_detail(&self, ticket_ref: &TicketRef) -> Result<TicketDetail> {
        let gate = {
            let mut state = self.state.lock();
            state.detail_requests.push(ticket_ref.clone());
            state.detail_gates.get(ticket_ref).cloned()
        };
        pass(gate).await;

        let state = self.state.lock();
        if state.failing_details.contains(ticket_ref) {
            return Err(DeskwatchError::Status {
                status: 404,
                path: format!("/api/tickets/{ticket_ref}"),
            });
        }
        match state.tickets.iter().find(|t| &t.ticket_ref == ticket_ref) {
            Some(t) => Ok(detail(ticket_ref.as_str(), &t.status)),
            None => Ok(detail(ticket_ref.as_str(), "CLOSED")),
        }
    }

    async fn health(&self) -> Result<Health> {
        Ok(Health {
            status: "ok".to_string(),
            db_path: None,
        })
    }
}

pub fn ticket(ticket_ref: &str, status: &str, desk: &str) -> TicketSummary {
    serde_json::from_value(json!({
        "ticket_ref": ticket_ref,
        "status": status,
        "priority": "P2",
        "subject": format!("Subject of {ticket_ref}"),
        "client_name": "Acme",
        "current_desk_code": desk,
        "current_desk_name": format!("{desk} Desk"),
        "created_age_min": 30,
    }))
    .expect("valid ticket fixture")
}

pub fn desk(code: &str) -> DeskSummary {
    serde_json::from_value(json!({
        "desk_code": code,
        "desk_name": format!("{code} Desk"),
        "active_tickets": 1,
    }))
    .expect("valid desk fixture")
}

pub fn detail(ticket_ref: &str, status: &str) -> TicketDetail {
    serde_json::from_value(json!({
        "ticket": {
            "ticket_ref": ticket_ref,
            "status": status,
            "subject": format!("Subject of {ticket_ref}"),
        },
        "routing_trace": [{
            "step_seq": 1,
            "node_name": "classify",
            "decision": format!("route {ticket_ref}"),
            "actor_type": "SYSTEM",
        }],
        "desk_plan": [],
        "desk_hops": [],
        "assignments": [],
        "messages": [],
    }))
    .expect("valid detail fixture")
}

pub type TestDashboard = Dashboard<FakeApi, MemorySurface>;

/// Dashboard over a fake backend seeded with two open FX tickets
pub fn dashboard() -> (Arc<TestDashboard>, FakeApi) {
    let api = FakeApi::new();
    api.set_tickets(vec![ticket("T1", "OPEN", "FX"), ticket("T2", "OPEN", "FX")]);
    api.set_desks(vec![desk("FX"), desk("OPS")]);
    let dashboard = Arc::new(Dashboard::new(api.clone(), MemorySurface::new(), 300, 25));
    (dashboard, api)
}
