//! Strict parsing of reasoning output into a [`Command`].
//!
//! The reasoning backend is asked to answer with exactly one JSON object.
//! A single fenced code block (` ```json ... ``` `) around that object is
//! tolerated; anything else around it is not. There is no partial
//! acceptance: a missing field, a wrong type or an unknown field fails the
//! whole response.

use super::entities::Command;
use crate::core::role::{Phase, Role};
use thiserror::Error;

/// Why a reasoning response could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty response")]
    Empty,

    #[error("response is not a JSON object: {0}")]
    NotJson(String),

    #[error("malformed command: {0}")]
    Schema(String),

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("field 'currentExecutionPlan' is only allowed for the proposer during execution")]
    UnexpectedPlanSnapshot,
}

/// Parse a raw response into a [`Command`].
pub fn parse_command(raw: &str) -> Result<Command, CommandParseError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CommandParseError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(CommandParseError::NotJson(format!(
            "expected an object, found {}",
            json_kind(&value)
        )));
    }

    let command: Command =
        serde_json::from_value(value).map_err(|e| CommandParseError::Schema(e.to_string()))?;

    if command.tool.trim().is_empty() {
        return Err(CommandParseError::EmptyField("tool"));
    }
    if command.execution_summary.trim().is_empty() {
        return Err(CommandParseError::EmptyField("executionSummary"));
    }
    if command.execution_description.trim().is_empty() {
        return Err(CommandParseError::EmptyField("executionDescription"));
    }

    Ok(command)
}

/// Parse a response emitted by `role` in `phase`.
///
/// Same as [`parse_command`], additionally refusing a plan snapshot from
/// anyone but the Proposer during Execution.
pub fn parse_command_for(
    raw: &str,
    role: Role,
    phase: Phase,
) -> Result<Command, CommandParseError> {
    let command = parse_command(raw)?;
    let snapshot_allowed = role == Role::Proposer && phase.is_execution();
    if command.current_plan_snapshot.is_some() && !snapshot_allowed {
        return Err(CommandParseError::UnexpectedPlanSnapshot);
    }
    Ok(command)
}

/// Remove one surrounding markdown code fence, if the whole body is fenced.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "tool": "readFile",
        "args": ["src/lib.rs"],
        "executionSummary": "Read lib",
        "executionDescription": "Reading src/lib.rs"
    }"#;

    #[test]
    fn test_parse_valid_command() {
        let cmd = parse_command(VALID).unwrap();
        assert_eq!(cmd.tool, "readFile");
        assert_eq!(cmd.args, vec!["src/lib.rs".to_string()]);
        assert_eq!(cmd.execution_summary, "Read lib");
        assert!(cmd.current_plan_snapshot.is_none());
    }

    #[test]
    fn test_parse_fenced_command() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_command(&fenced).unwrap().tool, "readFile");
    }

    #[test]
    fn test_parse_rejects_prose_around_json() {
        let text = format!("Sure! Here is the command:\n{}", VALID);
        assert!(matches!(
            parse_command(&text),
            Err(CommandParseError::NotJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let raw = r#"{"tool": "readFile", "args": [], "executionSummary": "x"}"#;
        let err = parse_command(raw).unwrap_err();
        assert!(matches!(err, CommandParseError::Schema(_)));
        assert!(err.to_string().contains("executionDescription"));
    }

    #[test]
    fn test_parse_rejects_empty_summary() {
        let raw = r#"{"tool": "readFile", "args": [], "executionSummary": " ", "executionDescription": "d"}"#;
        assert_eq!(
            parse_command(raw).unwrap_err(),
            CommandParseError::EmptyField("executionSummary")
        );
    }

    #[test]
    fn test_parse_rejects_non_string_args() {
        let raw = r#"{"tool": "listFiles", "args": [".", 2], "executionSummary": "s", "executionDescription": "d"}"#;
        assert!(matches!(
            parse_command(raw),
            Err(CommandParseError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let raw = r#"{"tool": "readFile", "args": [], "executionSummary": "s", "executionDescription": "d", "tool2": "executeCommand"}"#;
        assert!(matches!(
            parse_command(raw),
            Err(CommandParseError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_rejects_array_and_empty() {
        assert!(matches!(
            parse_command("[1, 2]"),
            Err(CommandParseError::NotJson(_))
        ));
        assert_eq!(parse_command("  "), Err(CommandParseError::Empty));
    }

    #[test]
    fn test_plan_snapshot_only_for_proposer_in_execution() {
        let raw = r#"{"tool": "readFile", "args": ["a"], "executionSummary": "s", "executionDescription": "d", "currentExecutionPlan": "| # |"}"#;
        assert!(parse_command_for(raw, Role::Proposer, Phase::Execution).is_ok());
        assert_eq!(
            parse_command_for(raw, Role::Proposer, Phase::Planning).unwrap_err(),
            CommandParseError::UnexpectedPlanSnapshot
        );
        assert_eq!(
            parse_command_for(raw, Role::Auditor, Phase::Execution).unwrap_err(),
            CommandParseError::UnexpectedPlanSnapshot
        );
    }
}
