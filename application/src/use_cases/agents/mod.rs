//! The three role agents.
//!
//! Each agent wraps its own [`ReasoningPort`] and produces or interprets
//! [`Command`](magi_domain::Command)s. Agents never mutate shared state; the
//! Phase Orchestrator owns the plan, histories and rejections.
//!
//! Every reasoning call goes through [`think`], which charges backend
//! errors against the session's failure budget, applies the cooldown and
//! aborts the session once the budget is exhausted.

mod auditor;
mod proposer;
mod review_loop;
mod verifier;

pub use auditor::Auditor;
pub use proposer::Proposer;
pub use verifier::Verifier;

pub(crate) use proposer::Proposal;
pub(crate) use review_loop::{ReviewRequest, Verdict};

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::PhaseProgressNotifier;
use crate::ports::reasoning::ReasoningPort;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::session_control::{Interrupted, SessionControl};
use magi_domain::{FailureVerdict, Phase, Role};
use std::sync::Arc;
use tracing::warn;

/// Agents for one orchestrator, one reasoning port per role.
#[derive(Clone)]
pub struct Agents {
    pub proposer: Proposer,
    pub auditor: Auditor,
    pub verifier: Verifier,
}

impl Agents {
    pub fn new(
        proposer: Arc<dyn ReasoningPort>,
        auditor: Arc<dyn ReasoningPort>,
        verifier: Arc<dyn ReasoningPort>,
    ) -> Self {
        Self {
            proposer: Proposer::new(proposer),
            auditor: Auditor::new(auditor),
            verifier: Verifier::new(verifier),
        }
    }

    /// All three roles on the same backend.
    pub fn shared(reasoning: Arc<dyn ReasoningPort>) -> Self {
        Self::new(reasoning.clone(), reasoning.clone(), reasoning)
    }
}

/// Collaborators an agent needs for one phase.
pub(crate) struct AgentEnv<'a> {
    pub phase: Phase,
    pub control: &'a SessionControl,
    pub executor: &'a dyn ToolExecutorPort,
    pub progress: &'a dyn PhaseProgressNotifier,
    pub logger: &'a dyn ConversationLogger,
}

/// One reasoning call, retried after backend errors until it returns text
/// or the failure budget runs out.
///
/// A returned response is not yet a success: the caller resets the budget
/// only once the response parses.
pub(crate) async fn think(
    env: &AgentEnv<'_>,
    role: Role,
    reasoning: &dyn ReasoningPort,
    prompt: &str,
) -> Result<String, Interrupted> {
    loop {
        env.control.check_cancelled()?;
        env.progress.on_thinking(role);
        match reasoning.think(prompt).await {
            Ok(text) => return Ok(text),
            Err(e) => report_failure(env, role, &e.to_string()).await?,
        }
    }
}

/// Charge one failure to the budget and tell the user about it.
///
/// Returns after the cooldown when a retry is allowed; aborts the session
/// and returns `Interrupted` when the budget is exhausted.
pub(crate) async fn report_failure(
    env: &AgentEnv<'_>,
    role: Role,
    message: &str,
) -> Result<(), Interrupted> {
    let verdict = env.control.record_failure();
    let consecutive = match verdict {
        FailureVerdict::Retry { consecutive } | FailureVerdict::Exhausted { consecutive } => {
            consecutive
        }
    };
    let threshold = env.control.failure_threshold();

    warn!(role = %role, consecutive, threshold, error = %message, "Reasoning failure");
    env.progress
        .on_reasoning_failure(role, message, consecutive, threshold);
    env.logger
        .log(ConversationEvent::reasoning_failure(role, message, consecutive));

    match verdict {
        FailureVerdict::Retry { .. } => env.control.cooldown().await,
        FailureVerdict::Exhausted { consecutive } => {
            let fatal = format!(
                "{} consecutive reasoning failures, giving up (last: {})",
                consecutive, message
            );
            env.progress.on_fatal(&fatal);
            env.control.abort(fatal);
            Err(Interrupted)
        }
    }
}
