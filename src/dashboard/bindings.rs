//! Interaction bindings: user commands mapped onto engine operations.
//!
//! Status and desk changes commit immediately, free-text query input goes
//! through the debouncer, and row selection loads detail.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::api::DashboardApi;
use crate::error::{DeskwatchError, Result};
use crate::surface::Surface;
use crate::types::{TicketRef, TicketStatus};

use super::engine::{Dashboard, DetailOutcome, RefreshOutcome};
use super::schedule::Debouncer;

/// Usage text for the interactive commands
pub const COMMAND_HELP: &str = "\
Commands:
  status <STATUS|->   filter by status (- for all)
  desk <CODE|->       filter by desk (- for all)
  query <text>        free-text search (empty to clear)
  select <REF|#n>     open a listed ticket by reference or row number
  refresh, r          refresh now
  help                show this help
  quit, q             exit";

/// Row picked by `select`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Ref(TicketRef),
    /// One-based row number in the ticket table
    Row(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status(Option<TicketStatus>),
    Desk(Option<String>),
    Query(String),
    Select(Selection),
    Refresh,
    Help,
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Status(Some(s)) => write!(f, "status {s}"),
            Command::Status(None) => f.write_str("status -"),
            Command::Desk(Some(d)) => write!(f, "desk {d}"),
            Command::Desk(None) => f.write_str("desk -"),
            Command::Query(q) => write!(f, "query {q}"),
            Command::Select(Selection::Ref(r)) => write!(f, "select {r}"),
            Command::Select(Selection::Row(n)) => write!(f, "select #{n}"),
            Command::Refresh => f.write_str("refresh"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

fn clearable(arg: &str) -> Option<&str> {
    match arg {
        "" | "-" | "all" | "ALL" => None,
        other => Some(other),
    }
}

impl FromStr for Command {
    type Err = DeskwatchError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "status" => clearable(arg)
                .map(TicketStatus::from_str)
                .transpose()
                .map(Command::Status),
            "desk" => Ok(Command::Desk(clearable(arg).map(str::to_string))),
            // Query text keeps its inner spacing; trimming happens on commit
            "query" | "/" => Ok(Command::Query(arg.to_string())),
            "select" | "s" => {
                if arg.is_empty() {
                    return Err(DeskwatchError::InvalidCommand(
                        "select needs a ticket reference or #row".to_string(),
                    ));
                }
                match arg.strip_prefix('#') {
                    Some(row) => match row.parse::<usize>() {
                        Ok(n) if n >= 1 => Ok(Command::Select(Selection::Row(n))),
                        _ => Err(DeskwatchError::InvalidCommand(format!(
                            "invalid row number '{row}'"
                        ))),
                    },
                    None => Ok(Command::Select(Selection::Ref(TicketRef::from(arg)))),
                }
            }
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(DeskwatchError::InvalidCommand(format!(
                "unknown command '{verb}' (type 'help')"
            ))),
        }
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// What the input loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Binds commands to one shared dashboard.
pub struct Bindings<C, S> {
    dashboard: Arc<Dashboard<C, S>>,
    debouncer: Debouncer,
}

impl<C, S> Bindings<C, S>
where
    C: DashboardApi + 'static,
    S: Surface + 'static,
{
    pub fn new(dashboard: Arc<Dashboard<C, S>>, debounce: Duration) -> Self {
        Self {
            dashboard,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Apply one command.
    ///
    /// Filter and refresh commands wait for their round to finish, except
    /// `query`, which only arms the debouncer.
    pub async fn handle(&self, command: Command) -> Result<Flow> {
        tracing::debug!(%command, "handling command");
        match command {
            Command::Status(status) => {
                self.dashboard.set_status_control(status);
                self.commit_filters().await;
            }
            Command::Desk(desk) => {
                self.dashboard.set_desk_control(desk);
                self.commit_filters().await;
            }
            Command::Query(text) => {
                self.dashboard.set_query_input(text);
                let dashboard = Arc::clone(&self.dashboard);
                self.debouncer.schedule(async move {
                    dashboard.on_filters_changed().await;
                });
            }
            Command::Select(selection) => {
                let ticket_ref = match selection {
                    Selection::Ref(r) => r,
                    Selection::Row(n) => self.dashboard.ticket_at(n - 1).ok_or_else(|| {
                        DeskwatchError::InvalidCommand(format!("no ticket in row #{n}"))
                    })?,
                };
                if self.dashboard.select_ticket(ticket_ref.clone()).await
                    == DetailOutcome::Unlisted
                {
                    return Err(DeskwatchError::InvalidCommand(format!(
                        "ticket {ticket_ref} is not in the current list"
                    )));
                }
            }
            Command::Refresh => {
                self.dashboard.refresh_dashboard(true).await;
            }
            Command::Help => return Ok(Flow::ShowHelp),
            Command::Quit => {
                self.debouncer.cancel();
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    async fn commit_filters(&self) -> RefreshOutcome {
        // A pending query edit is folded into this commit
        self.debouncer.cancel();
        self.dashboard.on_filters_changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            parse_command("status escalated").unwrap(),
            Some(Command::Status(Some(TicketStatus::Escalated)))
        );
        assert_eq!(parse_command("status -").unwrap(), Some(Command::Status(None)));
        assert_eq!(
            parse_command("desk FX").unwrap(),
            Some(Command::Desk(Some("FX".to_string())))
        );
        assert_eq!(parse_command("desk all").unwrap(), Some(Command::Desk(None)));
        assert!(matches!(
            parse_command("status later"),
            Err(DeskwatchError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_parse_query_keeps_inner_text() {
        assert_eq!(
            parse_command("query  late  wire ").unwrap(),
            Some(Command::Query("late  wire".to_string()))
        );
        assert_eq!(
            parse_command("query").unwrap(),
            Some(Command::Query(String::new()))
        );
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse_command("select TCK-9").unwrap(),
            Some(Command::Select(Selection::Ref(TicketRef::from("TCK-9"))))
        );
        assert_eq!(
            parse_command("select #3").unwrap(),
            Some(Command::Select(Selection::Row(3)))
        );
        assert!(parse_command("select #0").is_err());
        assert!(parse_command("select").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("R").unwrap(), Some(Command::Refresh));
        assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("help").unwrap(), Some(Command::Help));
        assert!(matches!(
            parse_command("frobnicate"),
            Err(DeskwatchError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_command_display_round_trips() {
        for line in ["status OPEN", "desk -", "select #2", "refresh"] {
            let command = parse_command(line).unwrap().unwrap();
            assert_eq!(command.to_string(), line);
        }
    }
}
