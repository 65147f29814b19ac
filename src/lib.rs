pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod logging;
pub mod macros;
pub mod surface;
pub mod types;

pub use api::{DashboardApi, HttpClient, TicketQuery};
pub use config::Config;
pub use dashboard::{
    Bindings, Dashboard, DashboardState, Debouncer, DetailOutcome, FilterControls, RefreshOutcome,
    RefreshTimer,
};
pub use error::{DeskwatchError, Result};
pub use surface::{MemorySurface, Region, Surface, TerminalSurface};
pub use types::{TicketDetail, TicketRef, TicketStatus, TicketSummary};
