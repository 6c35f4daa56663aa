//! Command entity

use crate::tool::names;
use serde::{Deserialize, Serialize};

/// A structured action proposal exchanged between agents and the orchestrator.
///
/// Wire format (camelCase JSON):
///
/// ```json
/// {
///   "tool": "readFile",
///   "args": ["src/main.rs"],
///   "executionSummary": "Read the entry point",
///   "executionDescription": "Reading src/main.rs to find the CLI wiring.",
///   "currentExecutionPlan": "| # | Task | Tool | Status | ..."
/// }
/// ```
///
/// `currentExecutionPlan` is only present on Proposer commands during
/// Execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Command {
    pub tool: String,
    pub args: Vec<String>,
    pub execution_summary: String,
    pub execution_description: String,
    #[serde(
        rename = "currentExecutionPlan",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_plan_snapshot: Option<String>,
}

impl Command {
    pub fn new(
        tool: impl Into<String>,
        args: Vec<String>,
        execution_summary: impl Into<String>,
        execution_description: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            args,
            execution_summary: execution_summary.into(),
            execution_description: execution_description.into(),
            current_plan_snapshot: None,
        }
    }

    pub fn with_plan_snapshot(mut self, plan: impl Into<String>) -> Self {
        self.current_plan_snapshot = Some(plan.into());
        self
    }

    /// A reject directive produced by the orchestrator itself.
    ///
    /// Used when a proposal is refused for procedural reasons (unparsable
    /// response, unknown tool, illegal plan mutation) rather than by a
    /// reviewing agent.
    pub fn synthetic_rejection(
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self::new(
            names::REJECT_EXECUTION,
            vec![description.clone()],
            summary,
            description,
        )
    }

    /// Positional argument, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(|s| s.as_str())
    }

    /// Positional argument that must be present and non-blank.
    pub fn require_arg(&self, index: usize, name: &str) -> Result<&str, String> {
        match self.arg(index) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(format!(
                "Missing required argument #{} '{}' for tool '{}'",
                index + 1,
                name,
                self.tool
            )),
        }
    }

    pub fn is_approval(&self) -> bool {
        self.tool == names::APPROVE_EXECUTION
    }

    pub fn is_rejection(&self) -> bool {
        self.tool == names::REJECT_EXECUTION
    }

    /// The reviewer's stated reason: first argument, falling back to the
    /// description when the argument list is empty.
    pub fn reason(&self) -> &str {
        match self.arg(0) {
            Some(reason) if !reason.trim().is_empty() => reason,
            _ => &self.execution_description,
        }
    }

    /// Pretty JSON used when echoing a command back into a prompt.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_arg() {
        let cmd = Command::new("readFile", vec!["  ".into()], "s", "d");
        assert!(cmd.require_arg(0, "path").is_err());
        assert!(cmd.require_arg(1, "depth").is_err());

        let cmd = Command::new("readFile", vec!["a.txt".into()], "s", "d");
        assert_eq!(cmd.require_arg(0, "path").unwrap(), "a.txt");
    }

    #[test]
    fn test_synthetic_rejection_is_rejection() {
        let cmd = Command::synthetic_rejection("Unknown tool", "fooBar is not a tool");
        assert!(cmd.is_rejection());
        assert_eq!(cmd.reason(), "fooBar is not a tool");
    }

    #[test]
    fn test_reason_falls_back_to_description() {
        let cmd = Command::new(names::APPROVE_EXECUTION, vec![], "ok", "Looks safe");
        assert_eq!(cmd.reason(), "Looks safe");
    }

    #[test]
    fn test_plan_snapshot_serialized_under_wire_name() {
        let cmd = Command::new("readFile", vec![], "s", "d").with_plan_snapshot("plan");
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["currentExecutionPlan"], "plan");
        assert_eq!(json["executionSummary"], "s");

        let plain = serde_json::to_value(Command::new("readFile", vec![], "s", "d")).unwrap();
        assert!(plain.get("currentExecutionPlan").is_none());
    }
}
