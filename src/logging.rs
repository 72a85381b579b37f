//! Logging setup shared by the command-line tools.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Determines the log level from CLI arguments.
///
/// `-q` wins over everything; each `-v` raises the level from info to
/// trace; otherwise the configured level applies.
#[must_use]
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
pub fn log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` directives are honoured alongside `level`.
pub fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
