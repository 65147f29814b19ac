use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::{DeskwatchError, Result};
use crate::types::{TicketStatus, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "deskwatch")]
#[command(about = "Live terminal dashboard for support desk operations")]
#[command(version)]
pub struct Cli {
    /// Config file (default: .deskwatch/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and DESKWATCH_URL
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Ticket-list filters shared by `watch` and `snapshot`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tickets in this status
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TicketStatus>,

    /// Only tickets currently at this desk code
    #[arg(long)]
    pub desk: Option<String>,

    /// Free-text search over ref, subject, requester and client
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live dashboard, reading commands from stdin
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Run one refresh round and print every panel
    Snapshot {
        #[command(flatten)]
        filters: FilterArgs,

        /// Also open this ticket's detail
        #[arg(long, value_parser = parse_ticket_ref)]
        ticket: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the full trace of one ticket
    #[command(visible_alias = "s")]
    Show {
        /// Ticket reference
        #[arg(value_parser = parse_ticket_ref)]
        ticket_ref: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the backend is reachable
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Config file location, honoring `--config`
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }

    /// Effective configuration: file, then `DESKWATCH_URL`, then `--url`.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        if self.config.is_some() && !path.exists() {
            return Err(DeskwatchError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let mut config = Config::load_from(&path)?;
        if let Some(url) = self.url.as_deref() {
            config.base_url = url.trim().to_string();
            config.validate()?;
        }
        Ok(config)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let path = self.config_path();
        self.command.run(&config, &path).await
    }
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self, config: &Config, config_path: &std::path::Path) -> Result<()> {
        use crate::commands::{cmd_config_show, cmd_health, cmd_show, cmd_snapshot, cmd_watch};

        match self {
            Commands::Watch { filters } => cmd_watch(config, &filters).await,
            Commands::Snapshot {
                filters,
                ticket,
                json,
            } => cmd_snapshot(config, &filters, ticket.as_deref(), json).await,
            Commands::Show { ticket_ref, json } => cmd_show(config, &ticket_ref, json).await,
            Commands::Health { json } => cmd_health(config, json).await,
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(config, config_path, json),
            },
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> std::result::Result<T, String>
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> std::result::Result<TicketStatus, String> {
    parse_with_validation(
        s,
        |v| TicketStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_ticket_ref(s: &str) -> std::result::Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("ticket reference cannot be empty".to_string());
    }
    if trimmed.chars().any(char::is_control) {
        return Err("ticket reference cannot contain control characters".to_string());
    }
    Ok(trimmed.to_string())
}
