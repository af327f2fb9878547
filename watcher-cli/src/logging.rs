use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout carries only the report.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,watcher_core={level},weather_watcher={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
