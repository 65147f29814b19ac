use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "DESKWATCH_LOG";

/// Filter from `DESKWATCH_LOG`, then `RUST_LOG`, then the default level.
///
/// The default is `warn`, or `deskwatch=debug` when `verbose` is set.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "warn,deskwatch=debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the dashboard on stdout.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
