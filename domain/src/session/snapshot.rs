//! Rejection records and phase snapshots.

use crate::command::Command;
use crate::core::role::{Phase, phase_flag};
use crate::tool::value_objects::ExecutionHistory;
use serde::{Deserialize, Serialize};

/// A refused proposal and the verdict that refused it.
///
/// `rejected_command` is `None` when the Proposer's response could not be
/// parsed at all; the prompt then asks for a well-formed response instead
/// of quoting the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionRecord {
    pub rejected_command: Option<Command>,
    pub reason: Command,
}

impl RejectionRecord {
    pub fn new(rejected_command: Option<Command>, reason: Command) -> Self {
        Self {
            rejected_command,
            reason,
        }
    }

    /// Rejection issued by the orchestrator rather than by a reviewer.
    pub fn synthetic(
        rejected_command: Option<Command>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            rejected_command,
            Command::synthetic_rejection(summary, description),
        )
    }
}

/// Complete state needed to resume a phase.
///
/// Persisted layout:
///
/// ```json
/// {
///   "phase": false,
///   "request": "...",
///   "plan": "...",
///   "proposerHistory": [ ...ToolResult ],
///   "rejectedCommand": null,
///   "rejectionReason": null
/// }
/// ```
///
/// `phase` is `true` for Execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSnapshot {
    #[serde(with = "phase_flag")]
    pub phase: Phase,
    pub request: String,
    /// Plan text; empty while Planning has not produced one.
    pub plan: String,
    pub proposer_history: ExecutionHistory,
    pub rejected_command: Option<Command>,
    pub rejection_reason: Option<Command>,
}

impl PhaseSnapshot {
    /// Fresh state for the start of a phase.
    pub fn new(phase: Phase, request: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            phase,
            request: request.into(),
            plan: plan.into(),
            proposer_history: ExecutionHistory::new(),
            rejected_command: None,
            rejection_reason: None,
        }
    }

    /// The pending rejection, if the snapshot was taken right after one.
    pub fn rejection(&self) -> Option<RejectionRecord> {
        self.rejection_reason
            .as_ref()
            .map(|reason| RejectionRecord::new(self.rejected_command.clone(), reason.clone()))
    }

    pub fn set_rejection(&mut self, rejection: Option<RejectionRecord>) {
        match rejection {
            Some(record) => {
                self.rejected_command = record.rejected_command;
                self.rejection_reason = Some(record.reason);
            }
            None => {
                self.rejected_command = None;
                self.rejection_reason = None;
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolResult;

    fn sample() -> PhaseSnapshot {
        let read = Command::new("readFile", vec!["Cargo.toml".into()], "read", "Read manifest");
        let mut snapshot = PhaseSnapshot::new(
            Phase::Execution,
            "add serde",
            "| # | Task | Tool | Status |\n|---|---|---|---|\n| 1 | a | readFile | done |",
        );
        snapshot
            .proposer_history
            .push(ToolResult::success(&read, "Read Cargo.toml").with_detail("[package]"));
        snapshot.set_rejection(Some(RejectionRecord::synthetic(
            Some(Command::new("executeCommand", vec!["rm -rf /".into()], "wipe", "Wipe disk")),
            "Destructive",
            "Refusing to delete the file system",
        )));
        snapshot
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        let restored = PhaseSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn test_phase_is_serialized_as_bool() {
        let json: serde_json::Value = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["phase"], serde_json::Value::Bool(true));
        assert!(json["proposerHistory"].is_array());
        assert_eq!(json["rejectedCommand"]["tool"], "executeCommand");

        let planning = PhaseSnapshot::new(Phase::Planning, "r", "");
        let json: serde_json::Value = serde_json::to_value(planning).unwrap();
        assert_eq!(json["phase"], serde_json::Value::Bool(false));
        assert!(json["rejectedCommand"].is_null());
        assert!(json["rejectionReason"].is_null());
    }

    #[test]
    fn test_rejection_accessors() {
        let mut snapshot = sample();
        let rejection = snapshot.rejection().unwrap();
        assert_eq!(rejection.reason.reason(), "Refusing to delete the file system");

        snapshot.set_rejection(None);
        assert!(snapshot.rejection().is_none());
        assert!(snapshot.rejected_command.is_none());
    }
}
