//! Tool Executor port
//!
//! Capability lookup and dispatch over the statically constructed tool pool.

use async_trait::async_trait;
use magi_domain::{Command, Phase, Role, ToolDefinition, ToolResult};

/// Port for tool lookup and execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of every registered tool.
    fn definitions(&self) -> Vec<&ToolDefinition>;

    /// Find a tool by name, honouring the (role, phase) capability matrix.
    fn lookup(&self, name: &str, role: Role, phase: Phase) -> Option<&ToolDefinition> {
        self.definitions()
            .into_iter()
            .find(|d| d.name == name && d.is_permitted(role, phase))
    }

    /// Whether a tool with this name exists at all.
    fn has_tool(&self, name: &str) -> bool {
        self.definitions().iter().any(|d| d.name == name)
    }

    /// Tools a role may name in a phase, in registration order.
    fn tools_for(&self, role: Role, phase: Phase) -> Vec<ToolDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.is_permitted(role, phase))
            .cloned()
            .collect()
    }

    /// Execute a command. Never fails: errors come back as a
    /// [`ToolResult`] with an error outcome.
    async fn execute(&self, command: &Command) -> ToolResult;
}
