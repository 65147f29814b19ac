mod config;
mod health;
mod show;
mod snapshot;
mod watch;

pub use config::cmd_config_show;
pub use health::cmd_health;
pub use show::cmd_show;
pub use snapshot::cmd_snapshot;
pub use watch::cmd_watch;

use serde_json::Value;

use crate::api::DashboardApi;
use crate::cli::FilterArgs;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::surface::Surface;

/// Output of a command: JSON for `--json`, text otherwise.
///
/// When no text is provided the JSON is pretty-printed in both modes.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Load command-line filters into the dashboard's filter controls.
fn apply_filter_args<C: DashboardApi, S: Surface>(dashboard: &Dashboard<C, S>, filters: &FilterArgs) {
    dashboard.set_status_control(filters.status);
    dashboard.set_desk_control(filters.desk.clone());
    if let Some(query) = &filters.query {
        dashboard.set_query_input(query.clone());
    }
}
