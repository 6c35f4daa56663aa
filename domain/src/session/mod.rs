//! Session state that outlives a single reasoning call
//!
//! - [`RejectionRecord`]: corrective context for the next Proposer turn
//! - [`PhaseSnapshot`]: everything needed to resume a phase
//! - [`FailureBudget`]: consecutive reasoning-failure accounting

pub mod failure;
pub mod snapshot;

pub use failure::{FailureBudget, FailureVerdict};
pub use snapshot::{PhaseSnapshot, RejectionRecord};
