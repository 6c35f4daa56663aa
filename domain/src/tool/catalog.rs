//! Definitions of the built-in tools.
//!
//! Concrete executors in the infrastructure layer attach behaviour to these
//! definitions; test doubles can use them directly to get the same
//! capability matrix without touching the file system.

use super::entities::{ToolDefinition, ToolKind, ToolParameter};
use super::names;

pub fn read_file() -> ToolDefinition {
    ToolDefinition::new(
        names::READ_FILE,
        "Read the full contents of an existing file.",
        ToolKind::Inspect,
    )
    .with_parameter(ToolParameter::new("path", "file path relative to the workspace root", true))
}

pub fn list_files() -> ToolDefinition {
    ToolDefinition::new(
        names::LIST_FILES,
        "List the entries of a directory.",
        ToolKind::Inspect,
    )
    .with_parameter(ToolParameter::new("path", "directory, default '.'", false))
    .with_parameter(ToolParameter::new("depth", "how many levels to descend, default 1", false))
}

pub fn tree_files() -> ToolDefinition {
    ToolDefinition::new(
        names::TREE_FILES,
        "Show the directory tree of the workspace. Hidden directories and build output are skipped.",
        ToolKind::Inspect,
    )
    .with_parameter(ToolParameter::new("maxDepth", "maximum depth, 0 for unlimited", false))
}

pub fn seek_files() -> ToolDefinition {
    ToolDefinition::new(
        names::SEEK_FILES,
        "Find files whose path matches a glob pattern such as '**/*.rs'.",
        ToolKind::Inspect,
    )
    .with_parameter(ToolParameter::new("globPattern", "glob pattern relative to the workspace root", true))
}

pub fn grep_files() -> ToolDefinition {
    ToolDefinition::new(
        names::GREP_FILES,
        "Search file contents with a regular expression. Results are 'path:line: text'.",
        ToolKind::Inspect,
    )
    .with_parameter(ToolParameter::new("pattern", "regular expression", true))
    .with_parameter(ToolParameter::new("directory", "directory to search, default '.'", false))
}

pub fn message() -> ToolDefinition {
    ToolDefinition::new(
        names::MESSAGE,
        "Show a message to the user. Use recommendComplete, not this, to report that the request is done.",
        ToolKind::Inform,
    )
    .with_parameter(ToolParameter::new("text", "message to display", true))
}

pub fn create_file() -> ToolDefinition {
    ToolDefinition::new(
        names::CREATE_FILE,
        "Create a new file, including missing parent directories. Write the complete file content.",
        ToolKind::Mutation,
    )
    .with_parameter(ToolParameter::new("path", "file path relative to the workspace root", true))
    .with_parameter(ToolParameter::new("content", "full file content", false))
}

pub fn update_file() -> ToolDefinition {
    ToolDefinition::new(
        names::UPDATE_FILE,
        "Replace the whole content of an existing file. Never abbreviate the content.",
        ToolKind::Mutation,
    )
    .with_parameter(ToolParameter::new("path", "file path relative to the workspace root", true))
    .with_parameter(ToolParameter::new("content", "new full file content", true))
}

pub fn execute_command() -> ToolDefinition {
    ToolDefinition::new(
        names::EXECUTE_COMMAND,
        "Run a shell command in the workspace root and capture its output.",
        ToolKind::Shell,
    )
    .with_parameter(ToolParameter::new("command", "shell command line", true))
}

pub fn plan_proposal() -> ToolDefinition {
    ToolDefinition::new(
        names::PLAN_PROPOSAL,
        "Submit the execution plan. args[0] is a markdown table with the header \
         '| # | Task | Tool | Status |', one row per task, every Status cell empty. \
         args[1] is a short human-readable overview of the plan and its risks.",
        ToolKind::PlanSubmission,
    )
    .with_parameter(ToolParameter::new("planTable", "plan task table", true))
    .with_parameter(ToolParameter::new("displaySummary", "overview for the user", false))
}

pub fn recommend_complete() -> ToolDefinition {
    ToolDefinition::new(
        names::RECOMMEND_COMPLETE,
        "Declare that the request has been fully accomplished.",
        ToolKind::Completion,
    )
    .with_parameter(ToolParameter::new(
        "completionEvidence",
        "what was done and why it is complete",
        true,
    ))
}

pub fn approve_execution() -> ToolDefinition {
    ToolDefinition::new(
        names::APPROVE_EXECUTION,
        "Approve the proposal under review: its format, purpose, background and procedure are sound.",
        ToolKind::Verdict,
    )
    .with_parameter(ToolParameter::new("reason", "grounds for the approval", true))
}

pub fn reject_execution() -> ToolDefinition {
    ToolDefinition::new(
        names::REJECT_EXECUTION,
        "Reject the proposal under review. Explain the problem and how to improve it in as much detail as possible.",
        ToolKind::Verdict,
    )
    .with_parameter(ToolParameter::new("reason", "reason and suggested improvement", true))
}

/// Every built-in definition, in prompt order.
pub fn builtin_definitions() -> Vec<ToolDefinition> {
    vec![
        message(),
        read_file(),
        list_files(),
        tree_files(),
        seek_files(),
        grep_files(),
        create_file(),
        update_file(),
        execute_command(),
        plan_proposal(),
        recommend_complete(),
        approve_execution(),
        reject_execution(),
    ]
}
