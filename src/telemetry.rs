//! Diagnostic logging setup.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter directive variable, e.g. `FOFIMON_LOG=debug`.
pub const LOG_VAR: &str = "FOFIMON_LOG";

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
