//! Structured logging setup for briefcraft
//!
//! Initialises a `tracing` subscriber once per process. Output goes to stderr so that
//! stdout stays free for generated results.
//!
//! # Example
//!
//! ```no_run
//! use briefcraft::util::logging;
//!
//! logging::init_logging(logging::config_from_env());
//!
//! tracing::info!("Application started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for briefcraft's own events
    pub level: Level,

    /// One JSON object per event, with source file and line
    pub use_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
        }
    }
}

/// Parses a log level, defaulting to INFO for unknown values
///
/// ```
/// use briefcraft::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("bogus"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// `RUST_LOG` wins; otherwise briefcraft at `level` and the HTTP stack at warn
fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    EnvFilter::new(filter_directives(level))
}

fn filter_directives(level: Level) -> String {
    [
        format!("briefcraft={}", level),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
    ]
    .join(",")
}

/// Initializes the logging system; calls after the first are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);
        let registry = tracing_subscriber::registry().with(filter);

        if config.use_json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        } else {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .init();
        }
    });
}

/// Reads `BRIEFCRAFT_LOG_LEVEL` and `BRIEFCRAFT_LOG_JSON`
pub fn config_from_env() -> LoggingConfig {
    let level = env::var("BRIEFCRAFT_LOG_LEVEL")
        .map(|v| parse_level(&v))
        .unwrap_or(Level::INFO);

    let use_json = env::var("BRIEFCRAFT_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    LoggingConfig { level, use_json }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_directives_quiet_http_stack() {
        let directives = filter_directives(Level::DEBUG);
        assert!(directives.starts_with("briefcraft=DEBUG"));
        assert!(directives.contains("reqwest=warn"));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("BRIEFCRAFT_LOG_LEVEL", "warn");
        env::set_var("BRIEFCRAFT_LOG_JSON", "true");

        let config = config_from_env();

        env::remove_var("BRIEFCRAFT_LOG_LEVEL");
        env::remove_var("BRIEFCRAFT_LOG_JSON");

        assert_eq!(config.level, Level::WARN);
        assert!(config.use_json);
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        env::remove_var("BRIEFCRAFT_LOG_LEVEL");
        env::set_var("BRIEFCRAFT_LOG_JSON", "yes");

        let config = config_from_env();

        env::remove_var("BRIEFCRAFT_LOG_JSON");

        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
    }
}
