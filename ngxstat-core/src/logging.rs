use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable selecting JSON log lines instead of plain text.
pub const LOG_FORMAT_ENV: &str = "NGXSTAT_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOptions {
    /// Raise the default level to `debug`.
    pub verbose: bool,
}

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay machine-readable.
///
/// `RUST_LOG` wins over the default level when set.
pub fn init_logging(opts: LoggingOptions) {
    let default_level = if opts.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    let result = if json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    // A subscriber installed earlier (tests, embedding) stays in place.
    let _ = result;
}

/// Colors only when stdout is a terminal.
pub fn default_color_mode() -> bool {
    io::stdout().is_terminal()
}
