//! Renderers for the ticket detail sub-panels.

use crate::types::{Assignment, DeskHop, Direction, Message, PlanStep, TicketSnapshot, TraceStep};

use super::formatters::{
    MISSING, fmt_minutes, fmt_timestamp, heading, labelled, muted, or_dash, sanitize,
    to_plain_text,
};

pub const EMPTY_TRACE: &str = "No routing trace yet.";
pub const EMPTY_JOURNEY: &str = "No desk route data.";
pub const EMPTY_ASSIGNMENTS: &str = "No assignment records.";
pub const EMPTY_MESSAGES: &str = "No messages available.";

/// Title shown when a detail fetch fails
pub const DETAIL_UNAVAILABLE: &str = "Detail unavailable";

fn snapshot_cells(ticket: &TicketSnapshot) -> Vec<(&'static str, String)> {
    let owner = match ticket.owner_agent_name.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            labelled(Some(name), ticket.owner_agent_code.as_deref())
        }
        _ => "Unassigned".to_string(),
    };
    vec![
        ("Ticket", sanitize(ticket.ticket_ref.as_str())),
        ("Status", or_dash(Some(&ticket.status))),
        ("Priority", or_dash(ticket.priority.as_deref())),
        (
            "Client",
            labelled(ticket.client_name.as_deref(), ticket.client_code.as_deref()),
        ),
        (
            "Intent",
            labelled(ticket.intent_name.as_deref(), ticket.intent_code.as_deref()),
        ),
        ("Owner", owner),
        (
            "Current Desk",
            labelled(
                ticket.current_desk_name.as_deref(),
                ticket.current_desk_code.as_deref(),
            ),
        ),
        ("Channel", or_dash(ticket.channel.as_deref())),
        ("Requester", or_dash(ticket.requester_email.as_deref())),
        ("Age", fmt_minutes(ticket.age_minutes)),
        ("Created", fmt_timestamp(ticket.created_at.as_deref())),
        (
            "First Response",
            fmt_timestamp(ticket.first_response_at.as_deref()),
        ),
    ]
}

/// Render the snapshot grid, two labelled cells per line
pub fn render_snapshot(ticket: &TicketSnapshot) -> String {
    snapshot_cells(ticket)
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|(label, value)| {
                    let value = if value.is_empty() { MISSING } else { value };
                    format!("{:<15}{:<36}", format!("{label}:"), value)
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the ordered routing trace
pub fn render_trace(trace: &[TraceStep]) -> String {
    if trace.is_empty() {
        return EMPTY_TRACE.to_string();
    }
    trace
        .iter()
        .map(|step| {
            let actor = match step.agent_name.as_deref() {
                Some(name) => format!("{} ({})", sanitize(&step.actor_type), sanitize(name)),
                None => sanitize(&step.actor_type),
            };
            format!(
                "{}\n  Decision: {}\n  Actor: {}\n  {}\n  {}",
                heading(&format!("#{} {}", step.step_seq, sanitize(&step.node_name))),
                sanitize(&step.decision),
                actor,
                muted(&sanitize(step.rationale.as_deref().unwrap_or(""))),
                muted(&fmt_timestamp(step.created_at.as_deref())),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the desk journey: planned steps first, then recorded hops
pub fn render_desk_journey(plan: &[PlanStep], hops: &[DeskHop]) -> String {
    if plan.is_empty() && hops.is_empty() {
        return EMPTY_JOURNEY.to_string();
    }

    let mut parts = Vec::with_capacity(plan.len() + hops.len());
    parts.extend(plan.iter().map(|p| {
        format!(
            "Plan #{}: {}\n  {}",
            p.step_seq,
            labelled(Some(&p.desk_name), Some(&p.desk_code)),
            muted(&sanitize(p.step_reason.as_deref().unwrap_or(""))),
        )
    }));
    parts.extend(hops.iter().map(|h| {
        let from = match h.from_desk_code.as_deref() {
            Some(code) if !code.is_empty() => labelled(h.from_desk_name.as_deref(), Some(code)),
            _ => "Entry".to_string(),
        };
        let actor = match h.agent_name.as_deref() {
            Some(name) => labelled(Some(name), h.agent_code.as_deref()),
            None => "System".to_string(),
        };
        format!(
            "Hop #{}: {} -> {}\n  {}\n  {}",
            h.hop_seq,
            from,
            labelled(Some(&h.to_desk_name), Some(&h.to_desk_code)),
            sanitize(h.hop_reason.as_deref().unwrap_or("")),
            muted(&format!(
                "By {} at {}",
                actor,
                fmt_timestamp(h.hopped_at.as_deref())
            )),
        )
    }));
    parts.join("\n")
}

/// Render assignment records
pub fn render_assignments(assignments: &[Assignment]) -> String {
    if assignments.is_empty() {
        return EMPTY_ASSIGNMENTS.to_string();
    }
    assignments
        .iter()
        .map(|a| {
            let mut when = format!("Assigned: {}", fmt_timestamp(a.assigned_at.as_deref()));
            if let Some(released) = a.released_at.as_deref().filter(|r| !r.is_empty()) {
                when.push_str(&format!(" | Released: {}", fmt_timestamp(Some(released))));
            }
            format!(
                "{} - {}\n  {}\n  {}\n  {}",
                labelled(Some(&a.agent_name), Some(&a.agent_code)),
                sanitize(&a.assignment_role),
                labelled(Some(&a.desk_name), Some(&a.desk_code)),
                muted(&sanitize(a.assignment_reason.as_deref().unwrap_or(""))),
                muted(&when),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the message exchange with bodies flattened to plain text
pub fn render_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return EMPTY_MESSAGES.to_string();
    }
    messages
        .iter()
        .map(|m| {
            let arrow = match m.direction {
                Direction::Inbound => "<-",
                Direction::Outbound => "->",
            };
            let body = to_plain_text(m.body.as_deref().unwrap_or(""))
                .lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "[{}] {} {} {}  {}\n  {}\n{}",
                m.direction,
                or_dash(m.sender_email.as_deref()),
                arrow,
                or_dash(m.recipient_email.as_deref()),
                muted(&fmt_timestamp(m.sent_at.as_deref())),
                heading(&or_dash(m.subject.as_deref())),
                body,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TicketRef;

    fn snapshot() -> TicketSnapshot {
        TicketSnapshot {
            ticket_ref: TicketRef::from("TCK-1"),
            status: "ESCALATED".to_string(),
            priority: Some("P1".to_string()),
            automatable: false,
            requires_multi_desk: true,
            requester_email: Some("cfo@acme.test".to_string()),
            subject: Some("Late settlement".to_string()),
            body: None,
            channel: Some("EMAIL".to_string()),
            created_at: Some("2025-02-01T08:00:00+00:00".to_string()),
            first_response_at: None,
            resolved_at: None,
            closed_at: None,
            client_code: Some("ACME".to_string()),
            client_name: Some("Acme Corp".to_string()),
            intent_code: Some("SETTLE".to_string()),
            intent_name: Some("Settlement".to_string()),
            primary_desk_code: Some("OPS".to_string()),
            primary_desk_name: Some("Operations".to_string()),
            current_desk_code: Some("FX".to_string()),
            current_desk_name: Some("FX Desk".to_string()),
            owner_agent_code: None,
            owner_agent_name: None,
            owner_agent_email: None,
            age_minutes: Some(125),
        }
    }

    #[test]
    fn test_snapshot_has_twelve_cells() {
        let out = render_snapshot(&snapshot());
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("Client:        Acme Corp (ACME)"));
        assert!(out.contains("Owner:         Unassigned"));
        assert!(out.contains("2h 5m"));
        assert!(out.contains("First Response:-") || out.contains("First Response: -"));
    }

    #[test]
    fn test_trace_lists_actor_with_agent() {
        let out = render_trace(&[TraceStep {
            step_seq: 1,
            node_name: "classify".to_string(),
            decision: "route:FX".to_string(),
            rationale: Some("currency keyword".to_string()),
            actor_type: "HUMAN".to_string(),
            agent_code: Some("AG1".to_string()),
            agent_name: Some("Dana".to_string()),
            created_at: None,
        }]);
        assert!(out.contains("#1 classify"));
        assert!(out.contains("Actor: HUMAN (Dana)"));
        assert_eq!(render_trace(&[]), EMPTY_TRACE);
    }

    #[test]
    fn test_journey_plan_then_hops() {
        let plan = [PlanStep {
            step_seq: 1,
            desk_code: "OPS".to_string(),
            desk_name: "Operations".to_string(),
            step_reason: None,
            required: true,
        }];
        let hops = [DeskHop {
            hop_seq: 1,
            from_desk_code: None,
            from_desk_name: None,
            to_desk_code: "OPS".to_string(),
            to_desk_name: "Operations".to_string(),
            hop_reason: Some("intake".to_string()),
            hopped_at: None,
            agent_code: None,
            agent_name: None,
        }];
        let out = render_desk_journey(&plan, &hops);
        let plan_at = out.find("Plan #1").unwrap();
        let hop_at = out.find("Hop #1: Entry -> Operations (OPS)").unwrap();
        assert!(plan_at < hop_at);
        assert!(out.contains("By System at -"));
        assert_eq!(render_desk_journey(&[], &[]), EMPTY_JOURNEY);
    }

    #[test]
    fn test_assignment_release_is_optional() {
        let mut a = Assignment {
            assignment_role: "OWNER".to_string(),
            assignment_reason: None,
            assigned_at: Some("2025-02-01T08:00:00+00:00".to_string()),
            released_at: None,
            agent_code: "AG1".to_string(),
            agent_name: "Dana".to_string(),
            agent_email: None,
            desk_code: "FX".to_string(),
            desk_name: "FX Desk".to_string(),
        };
        assert!(!render_assignments(std::slice::from_ref(&a)).contains("Released"));
        a.released_at = Some("2025-02-02T08:00:00+00:00".to_string());
        assert!(render_assignments(&[a]).contains("Released: 2025-02-02 08:00:00 UTC"));
    }

    #[test]
    fn test_message_body_is_plain_text() {
        let out = render_messages(&[Message {
            message_id: 7,
            direction: Direction::Inbound,
            sender_email: Some("cfo@acme.test".to_string()),
            recipient_email: Some("desk@bank.test".to_string()),
            subject: Some("Where is my wire?".to_string()),
            body: Some("<div>Please <i>check</i></div>".to_string()),
            sent_at: None,
            is_automated: false,
            delivery_status: None,
        }]);
        assert!(out.contains("[INBOUND] cfo@acme.test <- desk@bank.test"));
        assert!(out.contains("    Please check"));
        assert!(!out.contains("<i>"));
        assert_eq!(render_messages(&[]), EMPTY_MESSAGES);
    }
}
