//! Tool domain value objects: immutable results and the per-actor history
//!
//! Every tool execution produces a [`ToolResult`]. Failures are values here,
//! never errors: a missing argument, a bad path or a failing subprocess all
//! come back as `outcome = error` so the reviewing agent can see them.

use crate::command::Command;
use crate::tool::names;
use serde::{Deserialize, Serialize};

/// Success or failure of a tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutcome {
    Success,
    Error,
}

impl ToolOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolOutcome::Success => "success",
            ToolOutcome::Error => "error",
        }
    }
}

impl std::fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome record of executing a [`Command`] against a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Message shown to the user
    pub display_message: String,
    /// How the host should display it (always `showMessage` today)
    pub display_command: String,
    pub outcome: ToolOutcome,
    /// Tool output or error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The command that produced this result
    pub command: Command,
}

impl ToolResult {
    pub fn success(command: &Command, display_message: impl Into<String>) -> Self {
        Self {
            display_message: display_message.into(),
            display_command: names::SHOW_MESSAGE.to_string(),
            outcome: ToolOutcome::Success,
            detail: None,
            command: command.clone(),
        }
    }

    pub fn error(command: &Command, display_message: impl Into<String>) -> Self {
        Self {
            display_message: display_message.into(),
            display_command: names::SHOW_MESSAGE.to_string(),
            outcome: ToolOutcome::Error,
            detail: None,
            command: command.clone(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == ToolOutcome::Success
    }

    pub fn tool_name(&self) -> &str {
        &self.command.tool
    }
}

/// Ordered, append-only sequence of [`ToolResult`]s for one actor.
///
/// The Proposer's history spans a whole phase; Auditor and Verifier
/// histories only live for a single review attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHistory {
    entries: Vec<ToolResult>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ToolResult) {
        self.entries.push(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ToolResult> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolResult> {
        self.entries.iter()
    }
}

impl From<Vec<ToolResult>> for ExecutionHistory {
    fn from(entries: Vec<ToolResult>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a ExecutionHistory {
    type Item = &'a ToolResult;
    type IntoIter = std::slice::Iter<'a, ToolResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_cmd() -> Command {
        Command::new(names::READ_FILE, vec!["a.txt".into()], "read", "read a.txt")
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(&read_cmd(), "read a.txt").with_detail("contents");
        assert!(result.is_success());
        assert_eq!(result.tool_name(), "readFile");
        assert_eq!(result.display_command, "showMessage");
        assert_eq!(result.detail.as_deref(), Some("contents"));
    }

    #[test]
    fn test_tool_result_serializes_camel_case() {
        let result = ToolResult::error(&read_cmd(), "missing");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "error");
        assert_eq!(json["displayMessage"], "missing");
        assert!(json.get("detail").is_none());
        assert_eq!(json["command"]["tool"], "readFile");
    }

    #[test]
    fn test_history_is_ordered() {
        let mut history = ExecutionHistory::new();
        history.push(ToolResult::success(&read_cmd(), "first"));
        history.push(ToolResult::error(&read_cmd(), "second"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().display_message, "second");
        let messages: Vec<_> = history.iter().map(|r| r.display_message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
