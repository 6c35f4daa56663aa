//! Session driver
//!
//! Runs Planning to completion, then launches Execution as its own tokio
//! task with a child cancellation token so the caller's event loop stays
//! free to observe a cancellation request while actions are running.

#[cfg(test)]
mod tests;

use crate::config::SessionParams;
use crate::use_cases::run_phase::{PhaseError, PhaseOrchestrator, PhaseOutcome};
use crate::use_cases::session_control::{CancelReason, SessionControl};
use magi_domain::{Phase, PhaseSnapshot};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::info;

/// How a whole session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed {
        plan: String,
        summary: String,
    },
    Cancelled {
        snapshot: PhaseSnapshot,
        reason: CancelReason,
    },
}

enum HandleState {
    Finished(SessionOutcome),
    Running(JoinHandle<Result<PhaseOutcome, PhaseError>>),
}

/// Handle to a started session.
pub struct SessionHandle {
    control: SessionControl,
    plan: Option<String>,
    state: HandleState,
}

impl SessionHandle {
    /// Request cooperative cancellation of the session.
    pub fn cancel(&self) {
        self.control.cancel();
    }

    pub fn control(&self) -> &SessionControl {
        &self.control
    }

    /// The approved plan, once Planning has completed.
    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// Wait for Execution (if it was launched) and return the outcome.
    pub async fn join(self) -> Result<SessionOutcome, PhaseError> {
        let task = match self.state {
            HandleState::Finished(outcome) => return Ok(outcome),
            HandleState::Running(task) => task,
        };

        let outcome = task
            .await
            .map_err(|e| PhaseError::ExecutionJoin(e.to_string()))??;

        Ok(match outcome {
            PhaseOutcome::Complete(summary) => SessionOutcome::Completed {
                plan: self.plan.unwrap_or_default(),
                summary,
            },
            PhaseOutcome::Cancelled { snapshot, reason } => {
                SessionOutcome::Cancelled { snapshot, reason }
            }
        })
    }
}

/// Drives sessions through Planning and Execution.
///
/// Only one session is active at a time: starting a new one cancels the
/// previous one and begins with a fresh cancellation flag and failure
/// counter.
pub struct SessionDriver {
    orchestrator: Arc<PhaseOrchestrator>,
    params: SessionParams,
    active: Mutex<Option<SessionControl>>,
}

impl SessionDriver {
    pub fn new(orchestrator: Arc<PhaseOrchestrator>, params: SessionParams) -> Self {
        Self {
            orchestrator,
            params,
            active: Mutex::new(None),
        }
    }

    /// Cancel the active session, if any.
    pub fn cancel(&self) {
        if let Some(control) = self.active().as_ref() {
            control.cancel();
        }
    }

    /// Start a new session for `request`.
    pub async fn start(&self, request: impl Into<String>) -> Result<SessionHandle, PhaseError> {
        let request = request.into();
        info!(request = %request, "Session started");
        self.resume(PhaseSnapshot::new(Phase::Planning, request, ""))
            .await
    }

    /// Continue a session from a snapshot. A Planning snapshot proceeds into
    /// Execution once its plan is approved.
    pub async fn resume(&self, snapshot: PhaseSnapshot) -> Result<SessionHandle, PhaseError> {
        let control = self.begin();

        let (plan, execution) = match snapshot.phase {
            Phase::Planning => {
                let request = snapshot.request.clone();
                match self.orchestrator.run(snapshot, &control).await? {
                    PhaseOutcome::Complete(plan) => {
                        let next = PhaseSnapshot::new(Phase::Execution, request, plan.clone());
                        (plan, next)
                    }
                    PhaseOutcome::Cancelled { snapshot, reason } => {
                        return Ok(SessionHandle {
                            control,
                            plan: None,
                            state: HandleState::Finished(SessionOutcome::Cancelled {
                                snapshot,
                                reason,
                            }),
                        });
                    }
                }
            }
            Phase::Execution => (snapshot.plan.clone(), snapshot),
        };

        info!("Launching execution");
        let orchestrator = Arc::clone(&self.orchestrator);
        let child = control.child();
        let task = tokio::spawn(async move { orchestrator.run(execution, &child).await });

        Ok(SessionHandle {
            control,
            plan: Some(plan),
            state: HandleState::Running(task),
        })
    }

    fn begin(&self) -> SessionControl {
        let control = SessionControl::new(&self.params);
        if let Some(previous) = self.active().replace(control.clone()) {
            previous.cancel();
        }
        control
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<SessionControl>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
