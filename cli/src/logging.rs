//! Logging setup
//!
//! Logs go to stderr, stdout carries spectrum data. `RUST_LOG` takes
//! precedence; otherwise `ASA_DBG=D` enables debug and `ASA_DBG=T` trace.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting debug (`D`) or trace (`T`) output
pub const DEBUG_ENV: &str = "ASA_DBG";

/// Map an `ASA_DBG` value to a filter level
fn legacy_level(value: Option<&str>) -> &'static str {
    match value.and_then(|v| v.chars().next()) {
        Some('T') => "trace",
        Some('D') => "debug",
        _ => "info",
    }
}

/// Initialize tracing for the process
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let asa_dbg = std::env::var(DEBUG_ENV).ok();
        EnvFilter::new(legacy_level(asa_dbg.as_deref()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
