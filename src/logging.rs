//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::WidgetConfig;

/// Installs a stderr fmt subscriber.
///
/// `RUST_LOG` wins over `config.log_directive`. Returns `false` when a global
/// subscriber is already installed, so calling this more than once is harmless.
pub fn init_logging(config: &WidgetConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
