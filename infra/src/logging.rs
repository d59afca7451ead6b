//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when it is set and non-empty.

use ps_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::InfrastructureError;

/// Install the global subscriber described by `config`
///
/// Fails if the filter directives are invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directives.as_deref(), &config.level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|e| InfrastructureError::Config(format!("Failed to initialise logging: {}", e)))
}

/// Parse `env_directives` if present, else the configured `level`
pub fn build_filter(env_directives: Option<&str>, level: &str) -> Result<EnvFilter, InfrastructureError> {
    let directives = match env_directives {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => level,
    };

    EnvFilter::try_new(directives).map_err(|e| {
        InfrastructureError::Config(format!("Invalid log filter '{}': {}", directives, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used_without_env() {
        let filter = build_filter(None, "ps_core=debug,info").unwrap();
        assert!(filter.to_string().contains("ps_core=debug"));
    }

    #[test]
    fn test_env_directives_take_precedence() {
        let filter = build_filter(Some("ps_infra=trace"), "warn").unwrap();
        assert!(filter.to_string().contains("ps_infra=trace"));
    }

    #[test]
    fn test_blank_env_falls_back_to_level() {
        let filter = build_filter(Some("  "), "warn").unwrap();
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_invalid_directives_are_rejected() {
        let result = build_filter(None, "ps_core=loud");
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }
}
