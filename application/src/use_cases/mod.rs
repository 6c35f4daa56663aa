//! Use cases (application services)
//!
//! - [`run_phase`]: the Phase Orchestrator state machine
//! - [`run_session`]: the Session driver (Planning, then spawned Execution)
//! - [`agents`]: Proposer, Auditor and Verifier
//! - [`session_control`]: cancellation and the failure budget

pub mod agents;
pub mod run_phase;
pub mod run_session;
pub mod session_control;

#[cfg(test)]
pub(crate) mod test_support;
