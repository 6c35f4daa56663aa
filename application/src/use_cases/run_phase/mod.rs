//! Phase Orchestrator
//!
//! Drives one phase (Planning or Execution) through the propose → audit →
//! verify cycle as an explicit state machine:
//!
//! ```text
//! ProposerTurn ─► Audit ─┬─ approve ─► Execute ─┬─ closing tool ─► Verify ─┬─ approve ─► Complete
//!      ▲                 │                      │                          │
//!      │                 └─ reject ─────────────┼──────────────────────────┘ reject
//!      └────────────────────────────────────────┘ (other tools, closing-tool error)
//! ```
//!
//! Every transition first checks cancellation and unwinds into
//! [`PhaseOutcome::Cancelled`] with a [`PhaseSnapshot`] of the committed
//! state: plan, Proposer history and the pending rejection.

mod types;


pub use types::{PhaseError, PhaseOutcome};

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoPhaseProgress, PhaseProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::agents::{AgentEnv, Agents, Proposal, ReviewRequest, Verdict};
use crate::use_cases::session_control::{Interrupted, SessionControl};
use magi_domain::{
    Command, Phase, PhaseSnapshot, Plan, ProgressMarker, ProposerPrompt, RejectionRecord, Role,
    ToolKind, check_proposal_transition, follow_up_plan,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the state machine goes next.
enum Step {
    ProposerTurn,
    Audit(Command),
    Execute(Command),
    Verify(Command),
    Complete(String),
}

/// Use case that runs a single phase to completion or cancellation.
pub struct PhaseOrchestrator {
    agents: Agents,
    executor: Arc<dyn ToolExecutorPort>,
    progress: Arc<dyn PhaseProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
}

impl PhaseOrchestrator {
    pub fn new(agents: Agents, executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            agents,
            executor,
            progress: Arc::new(NoPhaseProgress),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn PhaseProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the phase described by `state` until the Verifier approves or
    /// the session is cancelled.
    ///
    /// `state` is either a fresh [`PhaseSnapshot::new`] or one restored
    /// from a previous cancellation; both resume at the Proposer's turn.
    pub async fn run(
        &self,
        mut state: PhaseSnapshot,
        control: &SessionControl,
    ) -> Result<PhaseOutcome, PhaseError> {
        let phase = state.phase;
        let resumed = !state.proposer_history.is_empty() || state.rejection_reason.is_some();
        let mut plan = match phase {
            Phase::Execution => Some(Plan::parse(&state.plan)?),
            Phase::Planning => None,
        };

        info!(phase = %phase, resumed, history = state.proposer_history.len(), "Phase started");
        self.progress.on_phase_start(phase, resumed);

        let env = AgentEnv {
            phase,
            control,
            executor: self.executor.as_ref(),
            progress: self.progress.as_ref(),
            logger: self.logger.as_ref(),
        };

        let mut step = Step::ProposerTurn;
        loop {
            if control.is_cancelled() {
                return Ok(self.cancelled(state, control));
            }

            let next = match step {
                Step::ProposerTurn => self.proposer_turn(&env, &mut state, plan.as_ref()).await,
                Step::Audit(command) => self.audit(&env, &mut state, command).await,
                Step::Execute(command) => {
                    Ok(self.execute(&env, &mut state, &mut plan, command).await)
                }
                Step::Verify(command) => self.verify(&env, &mut state, command).await,
                Step::Complete(result) => {
                    info!(phase = %phase, "Phase complete");
                    self.progress.on_phase_complete(phase, &result);
                    self.logger
                        .log(ConversationEvent::phase_complete(phase, &result));
                    return Ok(PhaseOutcome::Complete(result));
                }
            };

            step = match next {
                Ok(next) => next,
                Err(Interrupted) => return Ok(self.cancelled(state, control)),
            };
        }
    }

    async fn proposer_turn(
        &self,
        env: &AgentEnv<'_>,
        state: &mut PhaseSnapshot,
        plan: Option<&Plan>,
    ) -> Result<Step, Interrupted> {
        let tools = self.executor.tools_for(Role::Proposer, state.phase);
        let rejection = state.rejection();
        let input = ProposerPrompt {
            phase: state.phase,
            request: &state.request,
            plan: &state.plan,
            tools: &tools,
            history: &state.proposer_history,
            rejection: rejection.as_ref(),
        };

        let command = match self.agents.proposer.propose(env, &input).await? {
            Proposal::Command(command) => command,
            Proposal::Malformed(e) => {
                self.reject(
                    state,
                    RejectionRecord::synthetic(None, "Malformed response", e.to_string()),
                );
                return Ok(Step::ProposerTurn);
            }
        };

        info!(tool = %command.tool, summary = %command.execution_summary, "Proposal");
        self.progress.on_proposal(&command);
        self.logger
            .log(ConversationEvent::proposal(state.phase, &command));

        if let Err((summary, reason)) = self.screen(&command, state.phase, plan) {
            warn!(tool = %command.tool, reason = %reason, "Proposal refused before audit");
            self.reject(state, RejectionRecord::synthetic(Some(command), summary, reason));
            return Ok(Step::ProposerTurn);
        }

        Ok(Step::Audit(command))
    }

    /// Procedural checks the orchestrator applies before spending an audit:
    /// the tool must be permitted, and during Execution the plan snapshot
    /// must advance exactly the next pending task.
    fn screen(
        &self,
        command: &Command,
        phase: Phase,
        plan: Option<&Plan>,
    ) -> Result<(), (&'static str, String)> {
        let Some(definition) = self.executor.lookup(&command.tool, Role::Proposer, phase) else {
            let reason = if self.executor.has_tool(&command.tool) {
                format!(
                    "Tool '{}' is not available to the Proposer during {}",
                    command.tool, phase
                )
            } else {
                let available = self
                    .executor
                    .tools_for(Role::Proposer, phase)
                    .into_iter()
                    .map(|d| d.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "'{}' is not a tool. Available tools: {}",
                    command.tool, available
                )
            };
            return Err(("Unknown tool", reason));
        };

        if let Some(plan) = plan {
            let is_completion = definition.kind == ToolKind::Completion;
            check_proposal_transition(
                plan,
                command.current_plan_snapshot.as_deref(),
                is_completion,
            )
            .map_err(|e| ("Invalid plan update", e.to_string()))?;
        }

        Ok(())
    }

    async fn audit(
        &self,
        env: &AgentEnv<'_>,
        state: &mut PhaseSnapshot,
        command: Command,
    ) -> Result<Step, Interrupted> {
        let verdict = self
            .agents
            .auditor
            .audit(
                env,
                &ReviewRequest {
                    request: &state.request,
                    plan: &state.plan,
                    proposal: &command,
                    proposer_history: &state.proposer_history,
                },
            )
            .await?;

        Ok(match verdict {
            Verdict::Approve(_) => {
                state.set_rejection(None);
                Step::Execute(command)
            }
            Verdict::Reject(reason) => {
                self.reject(state, RejectionRecord::new(Some(command), reason));
                Step::ProposerTurn
            }
        })
    }

    /// Run an approved command and fold the result into the Proposer's
    /// history and the plan.
    async fn execute(
        &self,
        env: &AgentEnv<'_>,
        state: &mut PhaseSnapshot,
        plan: &mut Option<Plan>,
        command: Command,
    ) -> Step {
        let phase = state.phase;
        let kind = self
            .executor
            .lookup(&command.tool, Role::Proposer, phase)
            .map(|d| d.kind);
        let closing = kind.is_some_and(|k| k.closes(phase));

        // Follow-up work on a finished plan arrives as one appended row.
        if !closing
            && let Some(current) = plan.as_mut()
            && let Some(extended) =
                follow_up_plan(current, command.current_plan_snapshot.as_deref())
        {
            info!(tasks = extended.tasks().len(), "Plan extended with a follow-up task");
            *current = extended;
            self.commit_plan(state, current);
        }

        // Task being carried out, if this command advances the plan.
        let task_index = match plan.as_ref() {
            Some(current) if !closing => current.next_pending().map(|t| t.index),
            _ => None,
        };
        if let (Some(index), Some(current)) = (task_index, plan.as_mut()) {
            *current = current.with_marker(index, ProgressMarker::Audited);
            self.commit_plan(state, current);
        }

        debug!(tool = %command.tool, closing, "Executing approved command");
        let result = self.executor.execute(&command).await;
        env.progress.on_tool_result(Role::Proposer, &result);
        env.logger
            .log(ConversationEvent::tool_result(Role::Proposer, phase, &result));

        if let (Some(index), Some(current)) = (task_index, plan.as_mut()) {
            let marker = if result.is_success() {
                ProgressMarker::Done
            } else {
                ProgressMarker::Empty
            };
            *current = current.with_marker(index, marker);
            self.commit_plan(state, current);
        }

        let succeeded = result.is_success();
        state.proposer_history.push(result);

        if !closing {
            return Step::ProposerTurn;
        }
        if !succeeded {
            warn!(tool = %command.tool, "Closing tool failed; asking the Proposer again");
            return Step::ProposerTurn;
        }
        Step::Verify(command)
    }

    async fn verify(
        &self,
        env: &AgentEnv<'_>,
        state: &mut PhaseSnapshot,
        command: Command,
    ) -> Result<Step, Interrupted> {
        let verdict = self
            .agents
            .verifier
            .verify(
                env,
                &ReviewRequest {
                    request: &state.request,
                    plan: &state.plan,
                    proposal: &command,
                    proposer_history: &state.proposer_history,
                },
            )
            .await?;

        Ok(match verdict {
            Verdict::Approve(_) => {
                state.set_rejection(None);
                Step::Complete(command.arg(0).unwrap_or_default().to_string())
            }
            Verdict::Reject(reason) => {
                self.reject(state, RejectionRecord::new(Some(command), reason));
                Step::ProposerTurn
            }
        })
    }

    fn reject(&self, state: &mut PhaseSnapshot, rejection: RejectionRecord) {
        debug!(reason = %rejection.reason.reason(), "Rejection recorded");
        self.progress.on_rejection(&rejection);
        state.set_rejection(Some(rejection));
    }

    fn commit_plan(&self, state: &mut PhaseSnapshot, plan: &Plan) {
        state.plan = plan.as_str().to_string();
        self.progress.on_plan_update(&state.plan);
    }

    fn cancelled(&self, state: PhaseSnapshot, control: &SessionControl) -> PhaseOutcome {
        let reason = control.cancel_reason();
        info!(phase = %state.phase, reason = %reason, "Phase cancelled");
        self.progress.on_phase_cancelled(state.phase);
        self.logger.log(ConversationEvent::phase_cancelled(
            state.phase,
            &reason.to_string(),
        ));
        PhaseOutcome::Cancelled {
            snapshot: state,
            reason,
        }
    }
}
