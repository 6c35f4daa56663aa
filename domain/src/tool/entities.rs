//! Tool domain entities: definitions and the capability matrix

use crate::core::role::{Phase, Role};
use serde::{Deserialize, Serialize};

/// Capability class of a tool.
///
/// The class alone decides which role may use the tool in which phase:
///
/// | Kind           | Proposer        | Auditor | Verifier |
/// |----------------|-----------------|---------|----------|
/// | Inspect        | both            | both    | both     |
/// | Inform         | both            | both    | both     |
/// | Mutation       | Execution only  | -       | -        |
/// | Shell          | Execution only  | -       | -        |
/// | PlanSubmission | Planning only   | -       | -        |
/// | Completion     | Execution only  | -       | -        |
/// | Verdict        | -               | both    | both     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Read, search and list operations
    Inspect,
    /// Plain user-visible message
    Inform,
    /// File creation and modification
    Mutation,
    /// Shell command execution
    Shell,
    /// Submits the plan, closing the Planning phase
    PlanSubmission,
    /// Recommends completion, closing the Execution phase
    Completion,
    /// approve / reject directives
    Verdict,
}

impl ToolKind {
    /// Static eligibility predicate over (role, phase).
    pub fn permits(&self, role: Role, phase: Phase) -> bool {
        match self {
            ToolKind::Inspect | ToolKind::Inform => true,
            ToolKind::Mutation | ToolKind::Shell | ToolKind::Completion => {
                role == Role::Proposer && phase == Phase::Execution
            }
            ToolKind::PlanSubmission => role == Role::Proposer && phase == Phase::Planning,
            ToolKind::Verdict => role.is_reviewer(),
        }
    }

    /// Whether running the tool changes the outside world.
    pub fn has_side_effect(&self) -> bool {
        matches!(self, ToolKind::Mutation | ToolKind::Shell)
    }

    /// Whether a Proposer command with this tool ends `phase` (pending
    /// Verifier approval).
    pub fn closes(&self, phase: Phase) -> bool {
        match phase {
            Phase::Planning => matches!(self, ToolKind::PlanSubmission),
            Phase::Execution => matches!(self, ToolKind::Completion),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Inspect => "inspect",
            ToolKind::Inform => "inform",
            ToolKind::Mutation => "mutation",
            ToolKind::Shell => "shell",
            ToolKind::PlanSubmission => "plan_submission",
            ToolKind::Completion => "completion",
            ToolKind::Verdict => "verdict",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Positional parameter of a tool (Command args are an ordered list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
        }
    }
}

/// Definition of a tool that agents can name in a Command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Wire name (e.g. "readFile")
    pub name: String,
    /// Human-readable description shown in prompts
    pub description: String,
    pub kind: ToolKind,
    /// Positional parameters, in argument order
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_permitted(&self, role: Role, phase: Phase) -> bool {
        self.kind.permits(role, phase)
    }

    pub fn has_side_effect(&self) -> bool {
        self.kind.has_side_effect()
    }

    /// One prompt line per tool: name, argument list and description.
    pub fn prompt_line(&self) -> String {
        let params = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let optional = if p.required { "" } else { ", optional" };
                format!("args[{}] {} ({}{})", i, p.name, p.description, optional)
            })
            .collect::<Vec<_>>();

        if params.is_empty() {
            format!("- {}: {}", self.name, self.description)
        } else {
            format!(
                "- {}: {}\n    {}",
                self.name,
                self.description,
                params.join("\n    ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_matrix() {
        use Phase::*;
        use Role::*;

        for role in Role::ALL {
            for phase in [Planning, Execution] {
                assert!(ToolKind::Inspect.permits(role, phase));
                assert!(ToolKind::Inform.permits(role, phase));
                assert_eq!(ToolKind::Verdict.permits(role, phase), role != Proposer);
            }
        }

        assert!(ToolKind::Mutation.permits(Proposer, Execution));
        assert!(!ToolKind::Mutation.permits(Proposer, Planning));
        assert!(!ToolKind::Mutation.permits(Auditor, Execution));
        assert!(ToolKind::Shell.permits(Proposer, Execution));
        assert!(!ToolKind::Shell.permits(Verifier, Execution));

        assert!(ToolKind::PlanSubmission.permits(Proposer, Planning));
        assert!(!ToolKind::PlanSubmission.permits(Proposer, Execution));
        assert!(ToolKind::Completion.permits(Proposer, Execution));
        assert!(!ToolKind::Completion.permits(Proposer, Planning));
    }

    #[test]
    fn test_closing_kinds() {
        assert!(ToolKind::PlanSubmission.closes(Phase::Planning));
        assert!(!ToolKind::PlanSubmission.closes(Phase::Execution));
        assert!(ToolKind::Completion.closes(Phase::Execution));
        assert!(!ToolKind::Inspect.closes(Phase::Execution));
    }

    #[test]
    fn test_prompt_line_lists_arguments() {
        let def = ToolDefinition::new("readFile", "Read a file", ToolKind::Inspect)
            .with_parameter(ToolParameter::new("path", "workspace relative path", true));
        let line = def.prompt_line();
        assert!(line.starts_with("- readFile: Read a file"));
        assert!(line.contains("args[0] path"));
    }
}
