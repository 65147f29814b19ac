//! Dashboard synchronization: state, engine, scheduling and input bindings.

pub mod bindings;
pub mod engine;
pub mod schedule;
pub mod state;

pub use bindings::{Bindings, COMMAND_HELP, Command, Flow, Selection, parse_command};
pub use engine::{Dashboard, DetailOutcome, REFRESH_ERROR, RefreshOutcome, detail_fragments};
pub use schedule::{Debouncer, RefreshTimer, ScheduledTask};
pub use state::{DashboardState, FilterControls};
