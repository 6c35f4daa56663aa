//! Session parameters: retry policy of the orchestration loop.
//!
//! These are application-layer concerns loaded from the `[session]` config
//! section, not domain policy.

use magi_domain::FailureBudget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Consecutive reasoning failures after which the session is cancelled.
    pub max_consecutive_failures: u32,
    /// Delay applied after each failure before retrying.
    pub failure_cooldown: Duration,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            max_consecutive_failures: FailureBudget::DEFAULT_THRESHOLD,
            failure_cooldown: Duration::from_millis(3000),
        }
    }
}

impl SessionParams {
    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max;
        self
    }

    pub fn with_failure_cooldown(mut self, cooldown: Duration) -> Self {
        self.failure_cooldown = cooldown;
        self
    }

    pub fn failure_budget(&self) -> FailureBudget {
        FailureBudget::new(self.max_consecutive_failures)
    }
}
