//! Consecutive reasoning-failure accounting.

/// Result of recording one reasoning failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Below the threshold; cool down and retry.
    Retry { consecutive: u32 },
    /// Threshold reached; the session must be cancelled.
    Exhausted { consecutive: u32 },
}

/// Counts consecutive reasoning failures across the whole session,
/// regardless of which agent hit them. Any successful call resets it.
#[derive(Debug, Clone)]
pub struct FailureBudget {
    consecutive: u32,
    threshold: u32,
}

impl FailureBudget {
    pub const DEFAULT_THRESHOLD: u32 = 3;

    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn record_failure(&mut self) -> FailureVerdict {
        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive >= self.threshold {
            FailureVerdict::Exhausted {
                consecutive: self.consecutive,
            }
        } else {
            FailureVerdict::Retry {
                consecutive: self.consecutive,
            }
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for FailureBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_on_third_failure() {
        let mut budget = FailureBudget::default();
        assert_eq!(budget.record_failure(), FailureVerdict::Retry { consecutive: 1 });
        assert_eq!(budget.record_failure(), FailureVerdict::Retry { consecutive: 2 });
        assert_eq!(budget.record_failure(), FailureVerdict::Exhausted { consecutive: 3 });
    }

    #[test]
    fn test_success_resets_counter() {
        let mut budget = FailureBudget::default();
        budget.record_failure();
        budget.record_failure();
        budget.record_success();
        assert_eq!(budget.consecutive(), 0);
        assert_eq!(budget.record_failure(), FailureVerdict::Retry { consecutive: 1 });
    }

    #[test]
    fn test_zero_threshold_is_clamped() {
        let mut budget = FailureBudget::new(0);
        assert_eq!(budget.threshold(), 1);
        assert_eq!(budget.record_failure(), FailureVerdict::Exhausted { consecutive: 1 });
    }
}
