//! Proposer: decides the next action.

use super::{AgentEnv, report_failure, think};
use crate::ports::reasoning::ReasoningPort;
use crate::use_cases::session_control::Interrupted;
use magi_domain::{
    Command, CommandParseError, ProposerPrompt, Role, RolePromptTemplate, parse_command_for,
};
use std::sync::Arc;
use tracing::debug;

/// What the Proposer answered on one turn.
#[derive(Debug)]
pub(crate) enum Proposal {
    Command(Command),
    /// The response could not be parsed; already charged to the budget.
    Malformed(CommandParseError),
}

#[derive(Clone)]
pub struct Proposer {
    reasoning: Arc<dyn ReasoningPort>,
}

impl Proposer {
    pub fn new(reasoning: Arc<dyn ReasoningPort>) -> Self {
        Self { reasoning }
    }

    /// Plan mode during Planning, act mode during Execution; the prompt
    /// input's phase decides which.
    pub(crate) async fn propose(
        &self,
        env: &AgentEnv<'_>,
        input: &ProposerPrompt<'_>,
    ) -> Result<Proposal, Interrupted> {
        let prompt = RolePromptTemplate::proposer(input);
        let raw = think(env, Role::Proposer, self.reasoning.as_ref(), &prompt).await?;

        match parse_command_for(&raw, Role::Proposer, input.phase) {
            Ok(command) => {
                env.control.record_success();
                debug!(tool = %command.tool, "Proposer answered");
                Ok(Proposal::Command(command))
            }
            Err(e) => {
                report_failure(env, Role::Proposer, &format!("Malformed response: {}", e)).await?;
                Ok(Proposal::Malformed(e))
            }
        }
    }
}
