//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Install the global JSON subscriber.
///
/// `service.log_level` accepts a plain level or a full filter directive such
/// as `snippetbox=debug,tower_sessions=warn`; an unparsable value falls back
/// to `info`. `RUST_LOG` is not consulted, use `SNIPPETBOX_SERVICE__LOG_LEVEL`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = build_filter(&config.service.log_level);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Internal(format!("tracing already initialized: {}", e)))?;

    tracing::info!(
        environment = %config.service.environment,
        "Tracing initialized for service: {}",
        config.service.name
    );

    Ok(())
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_directives() {
        assert_eq!(build_filter("snippetbox=debug").to_string(), "snippetbox=debug");
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = Config::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
