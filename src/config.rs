//! Configuration management for briefcraft
//!
//! Settings are read once from environment variables with sensible defaults. Values that
//! are set but cannot be parsed are reported rather than replaced by defaults.
//!
//! # Environment Variables
//!
//! - `BRIEFCRAFT_API_KEY`: LLM API key; falls back to `GEMINI_API_KEY`, then `OPENAI_API_KEY`
//! - `BRIEFCRAFT_MODEL`: model identifier - default: "gemini-2.5-flash-preview-09-2025"
//! - `BRIEFCRAFT_ENDPOINT`: endpoint URL template, `{model}` is substituted
//! - `BRIEFCRAFT_REQUEST_TIMEOUT`: generation timeout in seconds - default: "60"
//! - `BRIEFCRAFT_HEALTH_TIMEOUT`: connectivity check timeout in seconds - default: "15"
//! - `BRIEFCRAFT_ATTACHMENT_DIR`: root for decoded attachments - default: system temp dir + "llm_attachments"
//! - `BRIEFCRAFT_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use briefcraft::{BriefcraftConfig, GenerationRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BriefcraftConfig::from_env()?;
//! config.validate()?;
//!
//! let orchestrator = config.create_orchestrator()?;
//! let result = orchestrator.generate(&GenerationRequest::new("A tip calculator"));
//! println!("{}", result.files.index_html);
//! # Ok(())
//! # }
//! ```

use crate::generation::GenerationOrchestrator;
use crate::llm::{BackendError, GeminiClient};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 15;
const DEFAULT_ATTACHMENT_DIR: &str = "llm_attachments";
const MAX_TIMEOUT_SECS: u64 = 600;

const API_KEY_VARS: [&str; 3] = ["BRIEFCRAFT_API_KEY", "GEMINI_API_KEY", "OPENAI_API_KEY"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not set. Set one of: {}", API_KEY_VARS.join(", "))]
    MissingApiKey,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Client initialization failed: {0}")]
    ClientInitError(#[from] BackendError),
}

#[derive(Clone)]
pub struct BriefcraftConfig {
    /// Static API key; `None` when no key variable is set
    pub api_key: Option<String>,

    /// Model identifier substituted into the endpoint template
    pub model: String,

    /// Endpoint URL template containing `{model}`
    pub endpoint_template: String,

    /// Generation request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connectivity check timeout in seconds
    pub health_timeout_secs: u64,

    /// Root under which each generation call gets its own attachment directory
    pub attachment_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BriefcraftConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            attachment_dir: env::temp_dir().join(DEFAULT_ATTACHMENT_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Reads a number of seconds from `var`; unset or blank gives `default`
fn secs_from_env(var: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::ParseError {
                    field: var.to_string(),
                    error: format!("'{}': {}", value, e),
                })
        }
        _ => Ok(default),
    }
}

impl BriefcraftConfig {
    /// Loads from `BRIEFCRAFT_*` environment variables, falling back to defaults for unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        let model = env::var("BRIEFCRAFT_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.model);

        let endpoint_template =
            env::var("BRIEFCRAFT_ENDPOINT").unwrap_or(defaults.endpoint_template);

        let request_timeout_secs =
            secs_from_env("BRIEFCRAFT_REQUEST_TIMEOUT", defaults.request_timeout_secs)?;
        let health_timeout_secs =
            secs_from_env("BRIEFCRAFT_HEALTH_TIMEOUT", defaults.health_timeout_secs)?;

        let attachment_dir = env::var("BRIEFCRAFT_ATTACHMENT_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.attachment_dir);

        let log_level = env::var("BRIEFCRAFT_LOG_LEVEL")
            .unwrap_or(defaults.log_level)
            .to_lowercase();

        Ok(Self {
            api_key,
            model,
            endpoint_template,
            request_timeout_secs,
            health_timeout_secs,
            attachment_dir,
            log_level,
        })
    }

    /// Checks timeouts, endpoint and log level
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secs) in [
            ("Request timeout", self.request_timeout_secs),
            ("Health timeout", self.health_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must be at least 1 second",
                    name
                )));
            }
            if secs > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} cannot exceed 10 minutes",
                    name
                )));
            }
        }

        if self.endpoint_template.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Endpoint template cannot be empty".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// The endpoint template with the model substituted
    pub fn endpoint_url(&self) -> String {
        self.endpoint_template.replace("{model}", &self.model)
    }

    /// Builds the Gemini client.
    ///
    /// A missing key is only warned about: requests will be rejected by the endpoint and
    /// generation falls back, which keeps `generate` available.
    pub fn create_client(&self) -> Result<Arc<GeminiClient>, ConfigError> {
        let api_key = match self.require_api_key() {
            Ok(key) => key.to_string(),
            Err(e) => {
                warn!("{}", e);
                String::new()
            }
        };

        let client = GeminiClient::with_timeouts(
            self.endpoint_url(),
            self.model.clone(),
            api_key,
            Duration::from_secs(self.request_timeout_secs),
            Duration::from_secs(self.health_timeout_secs),
        )?;

        Ok(Arc::new(client))
    }

    pub fn create_orchestrator(&self) -> Result<GenerationOrchestrator, ConfigError> {
        let client = self.create_client()?;
        Ok(GenerationOrchestrator::new(
            client,
            self.attachment_dir.clone(),
        ))
    }

    fn masked_key(&self) -> String {
        match &self.api_key {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("***{}", tail)
            }
            Some(_) => "***".to_string(),
            None => "(not set)".to_string(),
        }
    }

    /// Converts configuration to a display map; the API key is masked
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("api_key".to_string(), self.masked_key());
        map.insert("model".to_string(), self.model.clone());
        map.insert("endpoint".to_string(), self.endpoint_url());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "health_timeout_secs".to_string(),
            self.health_timeout_secs.to_string(),
        );
        map.insert(
            "attachment_dir".to_string(),
            self.attachment_dir.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Debug for BriefcraftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriefcraftConfig")
            .field("api_key", &self.masked_key())
            .field("model", &self.model)
            .field("endpoint_template", &self.endpoint_template)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("health_timeout_secs", &self.health_timeout_secs)
            .field("attachment_dir", &self.attachment_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl fmt::Display for BriefcraftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Briefcraft Configuration:")?;
        writeln!(f, "  API Key: {}", self.masked_key())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Endpoint: {}", self.endpoint_url())?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Health Timeout: {}s", self.health_timeout_secs)?;
        writeln!(f, "  Attachment Dir: {}", self.attachment_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn sample() -> BriefcraftConfig {
        BriefcraftConfig {
            api_key: Some("abcdef123456".to_string()),
            model: "gemini-test".to_string(),
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            request_timeout_secs: 60,
            health_timeout_secs: 15,
            attachment_dir: PathBuf::from("/tmp/briefcraft"),
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("BRIEFCRAFT_MODEL"),
            EnvGuard::unset("BRIEFCRAFT_ENDPOINT"),
            EnvGuard::unset("BRIEFCRAFT_REQUEST_TIMEOUT"),
            EnvGuard::unset("BRIEFCRAFT_HEALTH_TIMEOUT"),
            EnvGuard::unset("BRIEFCRAFT_ATTACHMENT_DIR"),
            EnvGuard::unset("BRIEFCRAFT_LOG_LEVEL"),
        ];

        let config = BriefcraftConfig::from_env().unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint_template, DEFAULT_ENDPOINT_TEMPLATE);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.health_timeout_secs, DEFAULT_HEALTH_TIMEOUT_SECS);
        assert_eq!(
            config.attachment_dir,
            env::temp_dir().join(DEFAULT_ATTACHMENT_DIR)
        );
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("BRIEFCRAFT_MODEL", "gemini-pro"),
            EnvGuard::set("BRIEFCRAFT_REQUEST_TIMEOUT", "90"),
            EnvGuard::set("BRIEFCRAFT_HEALTH_TIMEOUT", "5"),
            EnvGuard::set("BRIEFCRAFT_ATTACHMENT_DIR", "/var/tmp/att"),
            EnvGuard::set("BRIEFCRAFT_LOG_LEVEL", "DEBUG"),
        ];

        let config = BriefcraftConfig::from_env().unwrap();

        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.request_timeout_secs, 90);
        assert_eq!(config.health_timeout_secs, 5);
        assert_eq!(config.attachment_dir, PathBuf::from("/var/tmp/att"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_api_key_fallback_order() {
        let _guards = vec![
            EnvGuard::unset("BRIEFCRAFT_API_KEY"),
            EnvGuard::set("GEMINI_API_KEY", ""),
            EnvGuard::set("OPENAI_API_KEY", "legacy-key"),
        ];
        assert_eq!(
            BriefcraftConfig::from_env().unwrap().api_key.as_deref(),
            Some("legacy-key")
        );

        let _primary = EnvGuard::set("BRIEFCRAFT_API_KEY", "primary-key");
        assert_eq!(
            BriefcraftConfig::from_env().unwrap().api_key.as_deref(),
            Some("primary-key")
        );
    }

    #[test]
    #[serial]
    fn test_unparseable_timeout_is_reported() {
        let _guards = vec![
            EnvGuard::set("BRIEFCRAFT_REQUEST_TIMEOUT", "sixty"),
            EnvGuard::unset("BRIEFCRAFT_HEALTH_TIMEOUT"),
        ];

        match BriefcraftConfig::from_env() {
            Err(ConfigError::ParseError { field, error }) => {
                assert_eq!(field, "BRIEFCRAFT_REQUEST_TIMEOUT");
                assert!(error.contains("sixty"));
            }
            other => panic!("expected ParseError, got {:?}", other),
        }

        let _request = EnvGuard::set("BRIEFCRAFT_REQUEST_TIMEOUT", " 30 ");
        let _health = EnvGuard::set("BRIEFCRAFT_HEALTH_TIMEOUT", "-1");
        assert!(matches!(
            BriefcraftConfig::from_env(),
            Err(ConfigError::ParseError { field, .. }) if field == "BRIEFCRAFT_HEALTH_TIMEOUT"
        ));
    }

    #[test]
    #[serial]
    fn test_blank_timeout_uses_default() {
        let _guards = vec![
            EnvGuard::set("BRIEFCRAFT_REQUEST_TIMEOUT", "  "),
            EnvGuard::unset("BRIEFCRAFT_HEALTH_TIMEOUT"),
        ];
        let config = BriefcraftConfig::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_configuration_validation_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_configuration_validation_invalid_timeout() {
        let mut config = sample();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.health_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = sample();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url_substitutes_model() {
        assert_eq!(
            sample().endpoint_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = sample();
        config.api_key = None;
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(config.create_client().is_ok());
    }

    #[test]
    fn test_display_masks_key() {
        let config = sample();
        let display = format!("{}", config);
        assert!(display.contains("Briefcraft Configuration:"));
        assert!(display.contains("***3456"));
        assert!(!display.contains("abcdef123456"));
        assert!(!format!("{:?}", config).contains("abcdef123456"));
        assert_eq!(config.to_display_map()["api_key"], "***3456");
    }
}
