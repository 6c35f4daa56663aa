//! Protocol tools: message, planProposal, recommendComplete and the
//! reviewer verdict directives.
//!
//! None of these touch the file system. Plan submission and completion are
//! the closing tools of their phase; an error outcome from them sends the
//! Proposer back to work without consulting the Verifier.

use async_trait::async_trait;
use magi_domain::tool::catalog;
use magi_domain::{Command, Plan, Tool, ToolDefinition, ToolResult};

pub struct MessageTool {
    definition: ToolDefinition,
}

impl MessageTool {
    pub fn new() -> Self {
        Self {
            definition: catalog::message(),
        }
    }
}

impl Default for MessageTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for MessageTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        match command.require_arg(0, "text") {
            Ok(text) => ToolResult::success(command, text),
            Err(e) => ToolResult::error(command, e),
        }
    }
}

pub struct PlanProposalTool {
    definition: ToolDefinition,
}

impl PlanProposalTool {
    pub fn new() -> Self {
        Self {
            definition: catalog::plan_proposal(),
        }
    }
}

impl Default for PlanProposalTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for PlanProposalTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let table = match command.require_arg(0, "planTable") {
            Ok(t) => t,
            Err(e) => return ToolResult::error(command, e),
        };
        let plan = match Plan::parse(table) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, format!("Invalid plan table: {}", e)),
        };
        if !plan.all_empty() {
            return ToolResult::error(
                command,
                "Invalid plan table: every Status cell must be empty in a new plan",
            );
        }

        let summary = command
            .arg(1)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&command.execution_summary);
        ToolResult::success(
            command,
            format!("Plan with {} tasks proposed: {}", plan.tasks().len(), summary),
        )
        .with_detail(plan.as_str())
    }
}

pub struct RecommendCompleteTool {
    definition: ToolDefinition,
}

impl RecommendCompleteTool {
    pub fn new() -> Self {
        Self {
            definition: catalog::recommend_complete(),
        }
    }
}

impl Default for RecommendCompleteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RecommendCompleteTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        match command.require_arg(0, "completionEvidence") {
            Ok(evidence) => {
                ToolResult::success(command, "Completion recommended").with_detail(evidence)
            }
            Err(e) => ToolResult::error(command, e),
        }
    }
}

/// `approveExecution` / `rejectExecution`.
///
/// The review loop consumes verdicts directly; executing one only echoes
/// the stated reason.
pub struct VerdictTool {
    definition: ToolDefinition,
}

impl VerdictTool {
    pub fn approve() -> Self {
        Self {
            definition: catalog::approve_execution(),
        }
    }

    pub fn reject() -> Self {
        Self {
            definition: catalog::reject_execution(),
        }
    }
}

#[async_trait]
impl Tool for VerdictTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        ToolResult::success(command, command.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "| # | Task | Tool | Status |\n|---|------|------|--------|\n| 1 | Read it | readFile | |\n";

    fn cmd(tool: &str, args: &[&str]) -> Command {
        Command::new(
            tool,
            args.iter().map(|s| s.to_string()).collect(),
            "summary",
            "description",
        )
    }

    #[tokio::test]
    async fn test_message() {
        let result = MessageTool::new().execute(&cmd("message", &["hi"])).await;
        assert!(result.is_success());
        assert_eq!(result.display_message, "hi");
        assert_eq!(result.display_command, "showMessage");
    }

    #[tokio::test]
    async fn test_plan_proposal_accepts_fresh_plan() {
        let result = PlanProposalTool::new()
            .execute(&cmd("planProposal", &[PLAN, "one step"]))
            .await;
        assert!(result.is_success(), "{}", result.display_message);
        assert!(result.display_message.contains("1 tasks"));
        assert_eq!(result.detail.as_deref(), Some(PLAN));
    }

    #[tokio::test]
    async fn test_plan_proposal_rejects_unparsable_table() {
        let result = PlanProposalTool::new()
            .execute(&cmd("planProposal", &["just some prose"]))
            .await;
        assert!(!result.is_success());
        assert!(result.display_message.starts_with("Invalid plan table"));
    }

    #[tokio::test]
    async fn test_plan_proposal_rejects_started_plan() {
        let started = PLAN.replace("| readFile | |", "| readFile | done |");
        let result = PlanProposalTool::new()
            .execute(&cmd("planProposal", &[&started]))
            .await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_recommend_complete() {
        let tool = RecommendCompleteTool::new();
        let ok = tool.execute(&cmd("recommendComplete", &["all done"])).await;
        assert!(ok.is_success());
        assert_eq!(ok.detail.as_deref(), Some("all done"));

        let missing = tool.execute(&cmd("recommendComplete", &[])).await;
        assert!(!missing.is_success());
    }

    #[tokio::test]
    async fn test_verdict_echoes_reason() {
        let result = VerdictTool::reject()
            .execute(&cmd("rejectExecution", &["too risky"]))
            .await;
        assert_eq!(result.display_message, "too risky");
        assert_eq!(VerdictTool::approve().definition().name, "approveExecution");
    }
}
