//! Reasoning backend configuration (`[reasoning]` and `[agents]` sections)
//!
//! ```toml
//! [reasoning]
//! endpoint = "https://api.openai.com/v1"
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"
//! timeout_seconds = 300
//! temperature = 0.2
//!
//! [agents]
//! auditor_model = "o3"
//! ```

use magi_domain::Role;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: String,
    /// Model used by every role without an override.
    pub model: String,
    /// Environment variable holding the API key. Unset means no auth header.
    pub api_key_env: String,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 300,
            temperature: None,
        }
    }
}

/// Per-role model overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposer_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auditor_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier_model: Option<String>,
}

impl FileAgentsConfig {
    pub fn override_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Proposer => self.proposer_model.as_deref(),
            Role::Auditor => self.auditor_model.as_deref(),
            Role::Verifier => self.verifier_model.as_deref(),
        }
    }
}
