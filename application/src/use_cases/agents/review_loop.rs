//! Review loop shared by the Auditor and the Verifier.
//!
//! The reviewer is asked repeatedly until it answers with approve or
//! reject. Any other permitted tool it names is executed as an
//! investigation and its result appended to the reviewer's own history,
//! which lives only for this review attempt.

use super::{AgentEnv, report_failure, think};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::reasoning::ReasoningPort;
use crate::use_cases::session_control::Interrupted;
use magi_domain::{
    Command, ExecutionHistory, ReviewPrompt, Role, RolePromptTemplate, ToolResult,
    parse_command_for,
};
use tracing::{debug, info};

/// What is under review.
pub(crate) struct ReviewRequest<'a> {
    pub request: &'a str,
    pub plan: &'a str,
    pub proposal: &'a Command,
    pub proposer_history: &'a ExecutionHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    Approve(Command),
    Reject(Command),
}

pub(crate) async fn run_review(
    env: &AgentEnv<'_>,
    role: Role,
    reasoning: &dyn ReasoningPort,
    review: &ReviewRequest<'_>,
) -> Result<Verdict, Interrupted> {
    let tools = env.executor.tools_for(role, env.phase);
    let proposer_tools = env.executor.tools_for(Role::Proposer, env.phase);
    let mut own_history = ExecutionHistory::new();

    loop {
        env.control.check_cancelled()?;

        let prompt = RolePromptTemplate::reviewer(&ReviewPrompt {
            role,
            phase: env.phase,
            request: review.request,
            plan: review.plan,
            proposal: review.proposal,
            proposer_tools: &proposer_tools,
            tools: &tools,
            proposer_history: review.proposer_history,
            own_history: &own_history,
        });
        let raw = think(env, role, reasoning, &prompt).await?;

        let command = match parse_command_for(&raw, role, env.phase) {
            Ok(command) => {
                env.control.record_success();
                command
            }
            Err(e) => {
                report_failure(env, role, &format!("Malformed response: {}", e)).await?;
                continue;
            }
        };

        if command.is_approval() || command.is_rejection() {
            info!(
                role = %role,
                approved = command.is_approval(),
                reason = %command.reason(),
                "Verdict"
            );
            env.progress.on_verdict(role, &command);
            env.logger.log(ConversationEvent::verdict(
                role,
                env.phase,
                review.proposal,
                &command,
            ));
            return Ok(if command.is_approval() {
                Verdict::Approve(command)
            } else {
                Verdict::Reject(command)
            });
        }

        let result = if env.executor.lookup(&command.tool, role, env.phase).is_some() {
            debug!(role = %role, tool = %command.tool, "Reviewer investigation");
            env.executor.execute(&command).await
        } else {
            ToolResult::error(
                &command,
                format!(
                    "Tool '{}' is not available to the {} during {}",
                    command.tool,
                    role.display_name(),
                    env.phase
                ),
            )
        };
        env.progress.on_tool_result(role, &result);
        env.logger
            .log(ConversationEvent::tool_result(role, env.phase, &result));
        own_history.push(result);
    }
}
