//! Orchestration roles and run phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three cooperating agents.
///
/// | Role     | Responsibility                                         |
/// |----------|--------------------------------------------------------|
/// | Proposer | decides the next action (plans, acts, recommends done) |
/// | Auditor  | approves or rejects every proposed action              |
/// | Verifier | re-checks whole-phase completion before it can end     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Proposer,
    Auditor,
    Verifier,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Proposer, Role::Auditor, Role::Verifier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Proposer => "proposer",
            Role::Auditor => "auditor",
            Role::Verifier => "verifier",
        }
    }

    /// Display name used in prompts and progress output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Proposer => "Proposer",
            Role::Auditor => "Auditor",
            Role::Verifier => "Verifier",
        }
    }

    /// Whether this role reviews work instead of producing it.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::Auditor | Role::Verifier)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proposer" => Ok(Role::Proposer),
            "auditor" => Ok(Role::Auditor),
            "verifier" => Ok(Role::Verifier),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Top-level run mode.
///
/// Planning produces a Plan; Execution consumes it and performs real actions.
/// Serialized as the boolean `execution` flag in snapshots (see
/// [`phase_flag`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Planning,
    Execution,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Execution => "execution",
        }
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, Phase::Execution)
    }

    pub fn from_execution_flag(execution: bool) -> Self {
        if execution {
            Phase::Execution
        } else {
            Phase::Planning
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serde adapter that writes a [`Phase`] as `true` for Execution and
/// `false` for Planning.
pub mod phase_flag {
    use super::Phase;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(phase: &Phase, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(phase.is_execution())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Phase, D::Error> {
        bool::deserialize(deserializer).map(Phase::from_execution_flag)
    }
}
