use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Installs the global fmt subscriber on stderr. `RUST_LOG` wins over the configured
/// level. Calling it again is a no-op.
pub fn setup_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, "logging initialised");
    }
}
