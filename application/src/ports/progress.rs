//! Phase progress port.
//!
//! [`PhaseProgressNotifier`] is an **output port** the presentation layer
//! implements to show what the three roles are doing. Every error path in
//! the orchestrator reports through one of these callbacks before it
//! retries or aborts.
//!
//! All methods have default no-op implementations.

use magi_domain::{Command, Phase, RejectionRecord, Role, ToolResult};

pub trait PhaseProgressNotifier: Send + Sync {
    /// Called when a phase starts or resumes
    fn on_phase_start(&self, _phase: Phase, _resumed: bool) {}

    /// Called before an agent's reasoning call
    fn on_thinking(&self, _role: Role) {}

    /// Called when the Proposer produced a well-formed command
    fn on_proposal(&self, _command: &Command) {}

    /// Called when a reviewer approved or rejected a command
    fn on_verdict(&self, _role: Role, _verdict: &Command) {}

    /// Called when a proposal is refused; covers reviewer rejections and
    /// rejections issued by the orchestrator itself
    fn on_rejection(&self, _rejection: &RejectionRecord) {}

    /// Called after a tool ran on behalf of `role`
    fn on_tool_result(&self, _role: Role, _result: &ToolResult) {}

    /// Called when the plan's status cells changed
    fn on_plan_update(&self, _plan: &str) {}

    /// Called when a reasoning call failed or returned an unusable response
    fn on_reasoning_failure(&self, _role: Role, _message: &str, _consecutive: u32, _threshold: u32) {}

    /// Called once when the failure budget is exhausted
    fn on_fatal(&self, _message: &str) {}

    /// Called when the Verifier approved the phase
    fn on_phase_complete(&self, _phase: Phase, _result: &str) {}

    /// Called when the phase unwound because of cancellation
    fn on_phase_cancelled(&self, _phase: Phase) {}
}

/// No-op notifier for tests and quiet mode
pub struct NoPhaseProgress;

impl PhaseProgressNotifier for NoPhaseProgress {}
