//! Plan task table
//!
//! The plan is a markdown table produced in Planning and advanced one
//! status cell at a time during Execution.

pub mod table;
pub mod transition;

pub use table::{Plan, PlanError, PlanTask, ProgressMarker};
pub use transition::{PlanTransitionError, check_proposal_transition, follow_up_plan};
