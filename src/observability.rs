//! Tracing/logging initialization.
//!
//! `RUST_LOG` wins when set; otherwise the configured `LOG_LEVEL` directive is
//! used. Output is human-readable by default and JSON when `LOG_FORMAT=json`.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match config.log_format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => builder.with_target(true).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        let config = ServerConfig {
            log_level: "not a [valid directive".to_string(),
            ..Default::default()
        };
        init(&config);
        init(&ServerConfig::default());
    }
}
