//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into the runtime types the
//! application layer needs happens through the `to_*` helpers.

mod reasoning;
mod session;

pub use reasoning::{FileAgentsConfig, FileReasoningConfig};
pub use session::{FileLoggingConfig, FileSessionConfig, FileToolsConfig};

use magi_domain::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("reasoning.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("tools.command_timeout_seconds cannot be 0")]
    InvalidCommandTimeout,

    #[error("model name cannot be empty ({0})")]
    EmptyModelName(String),

    #[error("reasoning.endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("session.max_consecutive_failures must be at least 1")]
    ZeroFailureThreshold,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub reasoning: FileReasoningConfig,
    pub agents: FileAgentsConfig,
    pub session: FileSessionConfig,
    pub tools: FileToolsConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.reasoning.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.tools.command_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidCommandTimeout);
        }
        if self.reasoning.endpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        if self.reasoning.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("reasoning.model".into()));
        }
        for role in Role::ALL {
            if let Some(model) = self.agents.override_for(role)
                && model.trim().is_empty()
            {
                return Err(ConfigValidationError::EmptyModelName(format!(
                    "agents.{}_model",
                    role.as_str()
                )));
            }
        }
        if self.session.max_consecutive_failures == 0 {
            return Err(ConfigValidationError::ZeroFailureThreshold);
        }
        Ok(())
    }

    /// Model a role talks to: its override, or the shared default.
    pub fn model_for(&self, role: Role) -> &str {
        self.agents
            .override_for(role)
            .unwrap_or(&self.reasoning.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[reasoning]
endpoint = "http://localhost:11434/v1"
model = "qwen2.5-coder"
api_key_env = "LOCAL_KEY"
timeout_seconds = 60
temperature = 0.1

[agents]
verifier_model = "llama3"

[session]
max_consecutive_failures = 5
failure_cooldown_ms = 500
snapshot_path = "/tmp/magi.json"

[tools]
workspace_root = "/work"
command_timeout_seconds = 30

[logging]
conversation_log = "magi.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reasoning.endpoint, "http://localhost:11434/v1");
        assert_eq!(config.reasoning.temperature, Some(0.1));
        assert_eq!(config.model_for(Role::Proposer), "qwen2.5-coder");
        assert_eq!(config.model_for(Role::Verifier), "llama3");
        assert_eq!(config.session.max_consecutive_failures, 5);
        assert_eq!(config.tools.command_timeout_seconds, 30);
        assert_eq!(config.tools.max_output_bytes, 1024 * 1024);
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[reasoning]\nmodel = \"o3\"\n").unwrap();
        assert_eq!(config.reasoning.model, "o3");
        // Defaults should apply
        assert_eq!(config.reasoning.timeout_seconds, 300);
        assert_eq!(config.session, FileSessionConfig::default());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.reasoning.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.reasoning.model = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName(_))
        ));

        let mut config = FileConfig::default();
        config.agents.auditor_model = Some(String::new());
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName("agents.auditor_model".into()))
        );

        let mut config = FileConfig::default();
        config.session.max_consecutive_failures = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroFailureThreshold));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = FileConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
