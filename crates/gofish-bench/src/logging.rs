use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber for a bench run. Events go to stderr so
/// the JSONL stream on stdout-adjacent paths stays clean.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    if !logging.enabled {
        return Ok(());
    }

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if logging.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .finish();
        // Ignore error if a global subscriber is already set (e.g., tests).
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    Ok(())
}
