//! Result and error types of the phase orchestrator.

use crate::use_cases::session_control::CancelReason;
use magi_domain::{PhaseSnapshot, PlanError};
use thiserror::Error;

/// Terminal state of one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The Verifier approved. Holds the plan text after Planning, the
    /// completion narrative after Execution.
    Complete(String),
    /// The phase unwound; the snapshot resumes it.
    Cancelled {
        snapshot: PhaseSnapshot,
        reason: CancelReason,
    },
}

impl PhaseOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, PhaseOutcome::Complete(_))
    }
}

/// Failures that stop a phase without a resumable state.
#[derive(Error, Debug)]
pub enum PhaseError {
    #[error("Execution plan is unusable: {0}")]
    InvalidPlan(#[from] PlanError),

    #[error("Execution phase could not be joined: {0}")]
    ExecutionJoin(String),
}
