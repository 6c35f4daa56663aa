//! Tool capability interface
//!
//! Every concrete tool (file, search, shell, protocol directives) implements
//! [`Tool`]. The registry that owns them lives in the infrastructure layer;
//! the application layer talks to it through `ToolExecutorPort`.

use async_trait::async_trait;

use super::entities::ToolDefinition;
use super::value_objects::ToolResult;
use crate::command::Command;
use crate::core::role::{Phase, Role};

#[async_trait]
pub trait Tool: Send + Sync {
    /// Static definition: wire name, description, kind and parameters.
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Static eligibility predicate over (role, phase).
    fn is_permitted(&self, role: Role, phase: Phase) -> bool {
        self.definition().is_permitted(role, phase)
    }

    /// Run the command. Never fails: every failure is reported as a
    /// [`ToolResult`] with an error outcome.
    async fn execute(&self, command: &Command) -> ToolResult;
}
