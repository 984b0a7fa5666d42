//! `tracing` subscriber setup for the CLI.
//!
//! Filter directives come from `IDE_LAYOUT_LOG`, then the config file's
//! `[log] filter`, then `warn`. Output goes to stderr so `show` output on
//! stdout stays machine readable.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "IDE_LAYOUT_LOG";

fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .ok()
        .or_else(|| configured.and_then(|d| EnvFilter::try_new(d).ok()))
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install the global subscriber. Call once at startup; a second call is a
/// no-op.
pub fn init(configured: Option<&str>) {
    let _ = fmt()
        .with_env_filter(build_filter(configured))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
