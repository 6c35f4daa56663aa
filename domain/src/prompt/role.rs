//! Prompt templates for the three roles.

use super::sections;
use crate::command::Command;
use crate::core::role::{Phase, Role};
use crate::session::RejectionRecord;
use crate::tool::entities::ToolDefinition;
use crate::tool::value_objects::ExecutionHistory;

/// Everything the Proposer sees on one turn.
#[derive(Debug, Clone, Copy)]
pub struct ProposerPrompt<'a> {
    pub phase: Phase,
    pub request: &'a str,
    /// Current plan text; empty during Planning.
    pub plan: &'a str,
    pub tools: &'a [ToolDefinition],
    pub history: &'a ExecutionHistory,
    pub rejection: Option<&'a RejectionRecord>,
}

/// Everything a reviewer (Auditor or Verifier) sees on one iteration.
#[derive(Debug, Clone, Copy)]
pub struct ReviewPrompt<'a> {
    pub role: Role,
    pub phase: Phase,
    pub request: &'a str,
    pub plan: &'a str,
    /// Command under review.
    pub proposal: &'a Command,
    /// Tools the Proposer may use in this phase.
    pub proposer_tools: &'a [ToolDefinition],
    /// Tools the reviewer itself may use.
    pub tools: &'a [ToolDefinition],
    pub proposer_history: &'a ExecutionHistory,
    /// Investigations made during this review attempt.
    pub own_history: &'a ExecutionHistory,
}

/// Templates for generating role prompts
pub struct RolePromptTemplate;

impl RolePromptTemplate {
    /// Proposer prompt in plan mode (Planning) or act mode (Execution).
    pub fn proposer(input: &ProposerPrompt<'_>) -> String {
        let execution = input.phase.is_execution();
        let mut out = sections::protocol_overview(execution);
        out.push_str(
            "\nYou are the Proposer. You are careful and diligent, with complete \
             knowledge of software engineering. You never ask the user for \
             clarification; infer their intent and act.\n\n",
        );

        if execution {
            out.push_str(
                "# Your task\n\
                 Carry out the plan. Pick exactly the first task whose Status cell is empty \
                 and reply with the command that performs it. Copy the plan into \
                 currentExecutionPlan with only that task's Status changed to in-progress; \
                 change nothing else. When every task is done and the request is satisfied, \
                 reply with recommendComplete instead (currentExecutionPlan may then be \
                 omitted). If every task is done but the work is not finished (for \
                 example the Verifier rejected the completion), append exactly one new \
                 row for the follow-up action with Status in-progress and keep every \
                 other row unchanged.\n\n",
            );
        } else {
            out.push_str(
                "# Your task\n\
                 Investigate the workspace with the read and search tools as needed, then \
                 submit an execution plan with planProposal. The plan is a markdown table:\n\
                 ```\n\
                 | # | Task | Tool | Status |\n\
                 |---|------|------|--------|\n\
                 | 1 | what to do | toolName |  |\n\
                 ```\n\
                 One row per tool execution, in order. Leave every Status cell empty. \
                 Only plan work the request asks for.\n\n",
            );
        }

        out.push_str(&sections::response_format(execution));
        out.push('\n');
        out.push_str(&sections::tool_list("Available tools", input.tools));
        out.push('\n');
        out.push_str(&sections::fenced("Request", input.request));
        if execution {
            out.push('\n');
            out.push_str(&sections::fenced("Execution plan", input.plan));
        }
        out.push('\n');
        out.push_str(&sections::history("Your tool history", input.history));

        let rejection = sections::rejection(input.rejection);
        if !rejection.is_empty() {
            out.push('\n');
            out.push_str(&rejection);
        }
        out
    }

    /// Reviewer prompt. The Auditor reviews one command; the Verifier
    /// reviews a phase-closing command against the whole history.
    pub fn reviewer(input: &ReviewPrompt<'_>) -> String {
        let execution = input.phase.is_execution();
        let mut out = sections::protocol_overview(execution);
        out.push('\n');

        match input.role {
            Role::Verifier => out.push_str(&Self::verifier_task(execution)),
            _ => out.push_str(&Self::auditor_task(execution)),
        }

        out.push_str(
            "\nYou may use the read and search tools to investigate before deciding. \
             Finish with approveExecution or rejectExecution; args[0] is your reason. \
             When rejecting, explain the problem and how to fix it in as much detail as possible.\n\n",
        );
        out.push_str(&sections::response_format(false));
        out.push('\n');
        out.push_str(&sections::tool_list("Your tools", input.tools));
        out.push('\n');
        out.push_str(&sections::tool_list(
            "Tools the Proposer may use",
            input.proposer_tools,
        ));
        out.push('\n');
        out.push_str(&sections::fenced("Request", input.request));
        if !input.plan.trim().is_empty() {
            out.push('\n');
            out.push_str(&sections::fenced("Execution plan", input.plan));
        }
        out.push('\n');
        out.push_str(&sections::fenced(
            "Command under review",
            &input.proposal.to_pretty_json(),
        ));
        out.push('\n');
        out.push_str(&sections::history("Proposer tool history", input.proposer_history));
        if !input.own_history.is_empty() {
            out.push('\n');
            out.push_str(&sections::history(
                "Your investigations for this review",
                input.own_history,
            ));
        }
        out
    }

    fn auditor_task(execution: bool) -> String {
        let scope = if execution {
            "whether it is the right action for the current task of the plan"
        } else {
            "whether it is a sensible step toward drafting a plan for the request"
        };
        format!(
            "You are the Auditor. You are cautious and sceptical, dig into problems \
             and propose improvements. You never ask the user for clarification.\n\n\
             # Your task\n\
             Review the Proposer's command: check it is well-formed and {scope}. \
             Inspect the tool, every argument and the stated background. Reject it if it \
             is unsuitable, goes beyond the request, leaks confidential information or \
             could damage the system.\n\
             If the command is recommendComplete or planProposal, repeating earlier history \
             is acceptable. Use approveExecution to accept it; never reply with \
             recommendComplete or planProposal yourself.\n"
        )
    }

    fn verifier_task(execution: bool) -> String {
        let scope = if execution {
            "the request has been fully accomplished by the executed history"
        } else {
            "the submitted plan fully and safely accomplishes the request"
        };
        format!(
            "You are the Verifier. You are rigorous and independent. You never ask the \
             user for clarification.\n\n\
             # Your task\n\
             The Proposer claims the phase is finished. Review its whole tool history and \
             the closing command, and decide whether {scope}. Approve only if nothing \
             is missing; otherwise reject and describe what remains.\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::catalog;

    fn tools() -> Vec<ToolDefinition> {
        vec![catalog::read_file(), catalog::plan_proposal()]
    }

    #[test]
    fn test_planning_prompt_omits_plan_field() {
        let history = ExecutionHistory::new();
        let tools = tools();
        let prompt = RolePromptTemplate::proposer(&ProposerPrompt {
            phase: Phase::Planning,
            request: "add a README",
            plan: "",
            tools: &tools,
            history: &history,
            rejection: None,
        });
        assert!(prompt.contains("add a README"));
        assert!(prompt.contains("- planProposal:"));
        assert!(!prompt.contains("currentExecutionPlan\":"));
        assert!(!prompt.contains("Previous proposal was rejected"));
    }

    #[test]
    fn test_execution_prompt_includes_plan_and_rejection() {
        let history = ExecutionHistory::new();
        let tools = tools();
        let rejected = Command::new("updateFile", vec!["a".into(), "b".into()], "s", "d");
        let record = RejectionRecord::new(
            Some(rejected),
            Command::new("rejectExecution", vec!["Wrong file".into()], "no", "no"),
        );
        let prompt = RolePromptTemplate::proposer(&ProposerPrompt {
            phase: Phase::Execution,
            request: "r",
            plan: "| # | Task | Tool | Status |",
            tools: &tools,
            history: &history,
            rejection: Some(&record),
        });
        assert!(prompt.contains("# Execution plan"));
        assert!(prompt.contains("currentExecutionPlan"));
        assert!(prompt.contains("tool: updateFile"));
        assert!(prompt.contains("reason: Wrong file"));
    }

    #[test]
    fn test_reviewer_prompt_by_role() {
        let history = ExecutionHistory::new();
        let tools = tools();
        let proposal = Command::new("readFile", vec!["a".into()], "s", "d");
        let mut input = ReviewPrompt {
            role: Role::Auditor,
            phase: Phase::Planning,
            request: "r",
            plan: "",
            proposal: &proposal,
            proposer_tools: &tools,
            tools: &tools,
            proposer_history: &history,
            own_history: &history,
        };
        let auditor = RolePromptTemplate::reviewer(&input);
        assert!(auditor.contains("You are the Auditor"));
        assert!(auditor.contains("\"tool\": \"readFile\""));
        assert!(!auditor.contains("# Execution plan"));

        input.role = Role::Verifier;
        let verifier = RolePromptTemplate::reviewer(&input);
        assert!(verifier.contains("You are the Verifier"));
    }
}
