use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::apply_filter_args;
use crate::api::HttpClient;
use crate::cli::FilterArgs;
use crate::config::Config;
use crate::dashboard::{Bindings, COMMAND_HELP, Dashboard, Flow, RefreshTimer, parse_command};
use crate::error::Result;
use crate::surface::TerminalSurface;

const FOOTER: &str = "Type 'help' for commands, 'q' to quit.";

/// Run the live dashboard until `quit`, end of input or Ctrl-C
pub async fn cmd_watch(config: &Config, filters: &FilterArgs) -> Result<()> {
    let client = HttpClient::from_config(config)?;
    let surface = TerminalSurface::new(std::io::stdout().is_terminal()).with_footer(FOOTER);
    let dashboard = Arc::new(Dashboard::new(
        client,
        surface,
        config.ticket_limit,
        config.event_limit,
    ));
    apply_filter_args(&dashboard, filters);

    tracing::debug!(base_url = %config.base_url, "starting dashboard");
    dashboard.on_filters_changed().await;

    let timer = RefreshTimer::start(Arc::clone(&dashboard), config.refresh_interval());
    let bindings = Bindings::new(Arc::clone(&dashboard), config.search_debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(line) = interruptible(lines.next_line(), tokio::signal::ctrl_c()).await else {
            break;
        };
        let Some(line) = line? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match interruptible(bindings.handle(command), tokio::signal::ctrl_c()).await {
            Some(Ok(Flow::Continue)) => {}
            Some(Ok(Flow::ShowHelp)) => println!("{COMMAND_HELP}"),
            Some(Ok(Flow::Quit)) | None => break,
            Some(Err(e)) => eprintln!("{e}"),
        }
    }

    timer.stop();
    Ok(())
}

/// Run `work` unless `interrupt` completes first, in which case `None`.
async fn interruptible<T>(work: impl Future<Output = T>, interrupt: impl Future) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}
