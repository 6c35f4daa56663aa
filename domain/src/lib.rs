//! Domain layer for magi
//!
//! Pure types and rules of the propose → audit → verify protocol. No I/O:
//! reasoning backends, tools and storage live behind ports in the
//! application layer.
//!
//! # Core Concepts
//!
//! ## Roles
//!
//! - **Proposer**: decides the next action and emits it as a [`Command`]
//! - **Auditor**: must approve every proposed command before it runs
//! - **Verifier**: must approve the whole history before a phase ends
//!
//! ## Phases
//!
//! A session runs **Planning** (produces a [`Plan`]) and then **Execution**
//! (advances the plan one task at a time). Which tools a role may name in a
//! phase is decided by the [`ToolKind`] capability matrix.

pub mod command;
pub mod core;
pub mod plan;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use command::{Command, CommandParseError, parse_command, parse_command_for};
pub use core::role::{Phase, Role};
pub use plan::{
    Plan, PlanError, PlanTask, PlanTransitionError, ProgressMarker, check_proposal_transition,
    follow_up_plan,
};
pub use prompt::{ProposerPrompt, ReviewPrompt, RolePromptTemplate};
pub use session::{FailureBudget, FailureVerdict, PhaseSnapshot, RejectionRecord};
pub use tool::{
    entities::{ToolDefinition, ToolKind, ToolParameter},
    traits::Tool,
    value_objects::{ExecutionHistory, ToolOutcome, ToolResult},
};
