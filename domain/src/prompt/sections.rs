//! Shared prompt sections.

use crate::command::Command;
use crate::core::string::truncate;
use crate::session::RejectionRecord;
use crate::tool::entities::ToolDefinition;
use crate::tool::value_objects::ExecutionHistory;

/// Tool output longer than this is cut in history blocks.
const MAX_DETAIL_CHARS: usize = 4000;

pub(super) fn protocol_overview(execution: bool) -> String {
    let phase = if execution {
        "The plan has been approved and is now being executed one task at a time."
    } else {
        "No plan exists yet. The Proposer explores the workspace and drafts one."
    };
    format!(
        "# Protocol\n\
         Three agents cooperate on the user's request.\n\
         - Proposer decides the next action and emits it as a command.\n\
         - Auditor reviews every proposed command before it may run.\n\
         - Verifier reviews the whole history before the phase may end.\n\
         Nothing runs without the Auditor's approval and nothing finishes without the Verifier's.\n\
         {phase}\n"
    )
}

pub(super) fn response_format(include_plan: bool) -> String {
    let plan_field = if include_plan {
        ",\n  \"currentExecutionPlan\": \"the full plan table with the next task marked in-progress\""
    } else {
        ""
    };
    format!(
        "# Response format\n\
         Reply with exactly one JSON object and nothing else:\n\
         ```json\n\
         {{\n  \"tool\": \"toolName\",\n  \"args\": [\"first argument\", \"second argument\"],\n  \
         \"executionSummary\": \"short note on what this does and why, for your own later reference\",\n  \
         \"executionDescription\": \"message for the user: what runs, its purpose and background\"{plan_field}\n}}\n\
         ```\n\
         Every argument is a string. executionSummary and executionDescription must not be empty.\n"
    )
}

pub(super) fn tool_list(title: &str, tools: &[ToolDefinition]) -> String {
    let mut out = format!("# {title}\n");
    if tools.is_empty() {
        out.push_str("(none)\n");
    }
    for tool in tools {
        out.push_str(&tool.prompt_line());
        out.push('\n');
    }
    out
}

pub(super) fn command_block(command: &Command) -> String {
    let mut out = format!("tool: {}\n", command.tool);
    if command.args.is_empty() {
        out.push_str("args: []\n");
    } else {
        out.push_str("args:\n");
        for arg in &command.args {
            out.push_str(&indented_scalar("  - ", arg));
        }
    }
    out.push_str(&format!("executionSummary: {}\n", command.execution_summary));
    out.push_str(&format!(
        "executionDescription: {}\n",
        command.execution_description
    ));
    out
}

pub(super) fn history(title: &str, history: &ExecutionHistory) -> String {
    let mut out = format!("# {title}\n");
    if history.is_empty() {
        out.push_str("(no tools executed yet)\n");
        return out;
    }
    for (i, result) in history.iter().enumerate() {
        out.push_str(&format!("## Entry {}\n", i + 1));
        out.push_str(&format!("outcome: {}\n", result.outcome));
        out.push_str(&format!("displayMessage: {}\n", result.display_message));
        if let Some(detail) = &result.detail {
            out.push_str(&indented_scalar(
                "detail: ",
                &truncate(detail, MAX_DETAIL_CHARS),
            ));
        }
        out.push_str(&command_block(&result.command));
        out.push('\n');
    }
    out
}

pub(super) fn rejection(record: Option<&RejectionRecord>) -> String {
    let Some(record) = record else {
        return String::new();
    };
    let mut out = String::from(
        "# Previous proposal was rejected\n\
         Reply with an improved command that addresses the reason below. \
         Do not repeat the rejected command.\n\
         ## Rejected command\n",
    );
    match &record.rejected_command {
        Some(command) => out.push_str(&command_block(command)),
        None => out.push_str(
            "Your response was not well-formed and could not be read as a command. \
             Check the response format and reply again.\n",
        ),
    }
    out.push_str("## Reason\n");
    out.push_str(&format!("summary: {}\n", record.reason.execution_summary));
    out.push_str(&indented_scalar("reason: ", record.reason.reason()));
    out
}

pub(super) fn fenced(title: &str, body: &str) -> String {
    format!("# {title}\n```\n{}\n```\n", body.trim_end())
}

/// `prefix` + value, continuing multi-line values with a `|` block.
fn indented_scalar(prefix: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{prefix}{value}\n");
    }
    let mut out = format!("{prefix}|\n");
    for line in value.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
