//! Session, tools and logging sections

use std::path::PathBuf;
use std::time::Duration;

use magi_application::SessionParams;
use serde::{Deserialize, Serialize};

use crate::tools::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_OUTPUT_BYTES, ToolSettings};

/// `[session]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Consecutive reasoning failures before the session is cancelled.
    pub max_consecutive_failures: u32,
    /// Delay between a failure and the retry.
    pub failure_cooldown_ms: u64,
    /// Where the phase snapshot is written on cancellation.
    pub snapshot_path: PathBuf,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 3,
            failure_cooldown_ms: 3000,
            snapshot_path: PathBuf::from(".magi/snapshot.json"),
        }
    }
}

impl FileSessionConfig {
    pub fn to_session_params(&self) -> SessionParams {
        SessionParams::default()
            .with_max_consecutive_failures(self.max_consecutive_failures)
            .with_failure_cooldown(Duration::from_millis(self.failure_cooldown_ms))
    }
}

/// `[tools]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Root every tool path is confined to. Defaults to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
    pub command_timeout_seconds: u64,
    pub max_output_bytes: usize,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            command_timeout_seconds: DEFAULT_COMMAND_TIMEOUT.as_secs(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl FileToolsConfig {
    pub fn to_settings(&self) -> ToolSettings {
        ToolSettings {
            command_timeout: Duration::from_secs(self.command_timeout_seconds),
            max_output_bytes: self.max_output_bytes,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of proposals, verdicts and tool results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_params() {
        let cfg = FileSessionConfig {
            max_consecutive_failures: 5,
            failure_cooldown_ms: 10,
            ..Default::default()
        };
        let params = cfg.to_session_params();
        assert_eq!(params.max_consecutive_failures, 5);
        assert_eq!(params.failure_cooldown, Duration::from_millis(10));
    }

    #[test]
    fn test_tool_settings_defaults() {
        assert_eq!(FileToolsConfig::default().to_settings(), ToolSettings::default());
    }
}
