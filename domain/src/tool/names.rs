//! Wire names of every tool the protocol knows about.
//!
//! These strings appear verbatim in the `tool` field of a Command.

pub const READ_FILE: &str = "readFile";
pub const LIST_FILES: &str = "listFiles";
pub const TREE_FILES: &str = "getTreeFiles";
pub const SEEK_FILES: &str = "seekFiles";
pub const GREP_FILES: &str = "grepFiles";
pub const MESSAGE: &str = "message";
pub const CREATE_FILE: &str = "createFile";
pub const UPDATE_FILE: &str = "updateFile";
pub const EXECUTE_COMMAND: &str = "executeCommand";
pub const PLAN_PROPOSAL: &str = "planProposal";
pub const RECOMMEND_COMPLETE: &str = "recommendComplete";
pub const APPROVE_EXECUTION: &str = "approveExecution";
pub const REJECT_EXECUTION: &str = "rejectExecution";

/// Display command attached to every tool result.
pub const SHOW_MESSAGE: &str = "showMessage";
