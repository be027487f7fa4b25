//! Tracing subscriber bootstrap shared by every Kindred entry point.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a `fmt` subscriber filtered at `level`.
///
/// Falls back to `info` when `level` is not a valid filter directive. Calling
/// this more than once is harmless: later calls leave the first subscriber
/// in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        tracing::debug!(level, "Logging initialised");
    }
}

/// Install the subscriber at the level named in `[general] log_level`.
pub fn init_logging_from_config(general: &GeneralConfig) {
    init_logging(&general.log_level);
}
