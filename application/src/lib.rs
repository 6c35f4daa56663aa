//! Application layer for magi
//!
//! Ports, the three role agents, the Phase Orchestrator and the Session
//! driver. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoPhaseProgress, PhaseProgressNotifier},
    reasoning::{ReasoningError, ReasoningPort},
    snapshot_store::{SnapshotStore, SnapshotStoreError},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::agents::Agents;
pub use use_cases::run_phase::{PhaseError, PhaseOrchestrator, PhaseOutcome};
pub use use_cases::run_session::{SessionDriver, SessionHandle, SessionOutcome};
pub use use_cases::session_control::{CancelReason, SessionControl};
