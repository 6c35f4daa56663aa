//! Per-session coordination state: the cancellation token and the
//! consecutive-failure budget.
//!
//! One [`SessionControl`] is created for every session and passed by
//! reference to the orchestrator and agents. Nothing here is global, so a
//! new session starts with a fresh flag and a zeroed counter.

use crate::config::SessionParams;
use magi_domain::{FailureBudget, FailureVerdict};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Why a phase stopped before completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The session driver (user) requested cancellation.
    Requested,
    /// The consecutive reasoning-failure budget was exhausted.
    Fatal(String),
}

impl CancelReason {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CancelReason::Fatal(_))
    }
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "cancelled by request"),
            CancelReason::Fatal(message) => write!(f, "aborted: {}", message),
        }
    }
}

/// Signals that unwinding must stop the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interrupted;

#[derive(Debug, Clone)]
pub struct SessionControl {
    token: CancellationToken,
    budget: Arc<Mutex<FailureBudget>>,
    fatal: Arc<OnceLock<String>>,
    cooldown: Duration,
}

impl SessionControl {
    pub fn new(params: &SessionParams) -> Self {
        Self {
            token: CancellationToken::new(),
            budget: Arc::new(Mutex::new(params.failure_budget())),
            fatal: Arc::new(OnceLock::new()),
            cooldown: params.failure_cooldown,
        }
    }

    /// Control for a spawned phase: cancelled with its parent, sharing the
    /// failure budget.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            budget: Arc::clone(&self.budget),
            fatal: Arc::clone(&self.fatal),
            cooldown: self.cooldown,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            return Err(Interrupted);
        }
        Ok(())
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.budget().consecutive()
    }

    pub fn failure_threshold(&self) -> u32 {
        self.budget().threshold()
    }

    pub fn record_success(&self) {
        self.budget().record_success();
    }

    pub fn record_failure(&self) -> FailureVerdict {
        self.budget().record_failure()
    }

    /// Cancel the session with a fatal message. The first message wins.
    pub fn abort(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(message = %message, "Session aborted");
        let _ = self.fatal.set(message);
        self.token.cancel();
    }

    pub fn cancel_reason(&self) -> CancelReason {
        match self.fatal.get() {
            Some(message) => CancelReason::Fatal(message.clone()),
            None => CancelReason::Requested,
        }
    }

    /// Wait out the failure cooldown, returning early on cancellation.
    pub(crate) async fn cooldown(&self) -> Result<(), Interrupted> {
        if self.cooldown.is_zero() {
            return self.check_cancelled();
        }
        debug!(cooldown_ms = self.cooldown.as_millis() as u64, "Cooling down after failure");
        tokio::select! {
            _ = self.token.cancelled() => Err(Interrupted),
            _ = tokio::time::sleep(self.cooldown) => Ok(()),
        }
    }

    fn budget(&self) -> std::sync::MutexGuard<'_, FailureBudget> {
        self.budget.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_shares_budget_and_follows_parent() {
        let parent = SessionControl::new(&SessionParams::default());
        let child = parent.child();

        child.record_failure();
        assert_eq!(parent.consecutive_failures(), 1);

        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_cancel_parent() {
        let parent = SessionControl::new(&SessionParams::default());
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_abort_sets_fatal_reason() {
        let control = SessionControl::new(&SessionParams::default());
        assert_eq!(control.cancel_reason(), CancelReason::Requested);

        control.abort("three failures");
        control.abort("ignored");
        assert!(control.is_cancelled());
        assert_eq!(
            control.cancel_reason(),
            CancelReason::Fatal("three failures".into())
        );
    }

    #[test]
    fn test_new_session_starts_fresh() {
        let first = SessionControl::new(&SessionParams::default());
        first.record_failure();
        first.cancel();

        let second = SessionControl::new(&SessionParams::default());
        assert!(!second.is_cancelled());
        assert_eq!(second.consecutive_failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_waits_then_returns() {
        let params = SessionParams::default().with_failure_cooldown(Duration::from_secs(3));
        let control = SessionControl::new(&params);
        let start = tokio::time::Instant::now();
        assert_eq!(control.cooldown().await, Ok(()));
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_interrupted_by_cancel() {
        let params = SessionParams::default().with_failure_cooldown(Duration::from_secs(60));
        let control = SessionControl::new(&params);
        let canceller = control.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });
        assert_eq!(control.cooldown().await, Err(Interrupted));
    }
}
