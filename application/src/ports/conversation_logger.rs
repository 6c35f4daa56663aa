//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording the protocol
//! transcript (proposals, verdicts, tool results, failures, phase ends) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! exchange between roles in a machine-readable format (JSONL).

use magi_domain::{Command, Phase, Role, ToolResult};
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "proposal", "verdict").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn proposal(phase: Phase, command: &Command) -> Self {
        Self::new(
            "proposal",
            json!({ "phase": phase.as_str(), "command": command }),
        )
    }

    pub fn verdict(role: Role, phase: Phase, proposal: &Command, verdict: &Command) -> Self {
        Self::new(
            "verdict",
            json!({
                "role": role.as_str(),
                "phase": phase.as_str(),
                "approved": verdict.is_approval(),
                "proposal": proposal,
                "verdict": verdict,
            }),
        )
    }

    pub fn tool_result(role: Role, phase: Phase, result: &ToolResult) -> Self {
        Self::new(
            "tool_result",
            json!({ "role": role.as_str(), "phase": phase.as_str(), "result": result }),
        )
    }

    pub fn reasoning_failure(role: Role, message: &str, consecutive: u32) -> Self {
        Self::new(
            "reasoning_failure",
            json!({ "role": role.as_str(), "message": message, "consecutive": consecutive }),
        )
    }

    pub fn phase_complete(phase: Phase, result: &str) -> Self {
        Self::new(
            "phase_complete",
            json!({ "phase": phase.as_str(), "result": result }),
        )
    }

    pub fn phase_cancelled(phase: Phase, reason: &str) -> Self {
        Self::new(
            "phase_cancelled",
            json!({ "phase": phase.as_str(), "reason": reason }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and non-fallible; implementations swallow their own
/// write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_event_payload() {
        let proposal = Command::new("readFile", vec!["a".into()], "s", "d");
        let verdict = Command::new("approveExecution", vec!["fine".into()], "ok", "ok");
        let event = ConversationEvent::verdict(Role::Auditor, Phase::Planning, &proposal, &verdict);
        assert_eq!(event.event_type, "verdict");
        assert_eq!(event.payload["approved"], true);
        assert_eq!(event.payload["role"], "auditor");
        assert_eq!(event.payload["proposal"]["tool"], "readFile");
    }
}
