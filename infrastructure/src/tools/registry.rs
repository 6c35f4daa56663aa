//! Tool Registry
//!
//! The [`ToolRegistry`] owns the statically constructed tool pool and
//! implements [`ToolExecutorPort`]. Tools are kept in registration order,
//! which is also the order they are listed in prompts.
//!
//! # Usage
//!
//! ```ignore
//! use magi_infrastructure::tools::{ToolRegistry, ToolSettings, Workspace};
//!
//! let workspace = Workspace::new(".")?;
//! let registry = ToolRegistry::builtin(workspace, &ToolSettings::default())?;
//!
//! assert!(registry.has_tool("readFile"));
//! let def = registry.lookup("createFile", Role::Auditor, Phase::Execution);
//! assert!(def.is_none());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use magi_application::ToolExecutorPort;
use magi_domain::{Command, Tool, ToolDefinition, ToolResult};
use thiserror::Error;
use tracing::{debug, warn};

use super::command::ExecuteCommandTool;
use super::file::{CreateFileTool, ReadFileTool, UpdateFileTool};
use super::listing::{ListFilesTool, TreeFilesTool};
use super::protocol::{MessageTool, PlanProposalTool, RecommendCompleteTool, VerdictTool};
use super::search::{GrepFilesTool, SeekFilesTool};
use super::workspace::Workspace;
use super::ToolSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is registered more than once")]
    Duplicate(String),
}

pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    /// Tool name -> position in `tools`
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Build a registry. Fails if two tools share a name.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (pos, tool) in tools.iter().enumerate() {
            if index.insert(tool.name().to_string(), pos).is_some() {
                return Err(RegistryError::Duplicate(tool.name().to_string()));
            }
        }
        Ok(Self { tools, index })
    }

    /// Every built-in tool bound to `workspace`.
    pub fn builtin(workspace: Workspace, settings: &ToolSettings) -> Result<Self, RegistryError> {
        let ws = Arc::new(workspace);
        Self::new(vec![
            Arc::new(ReadFileTool::new(ws.clone())),
            Arc::new(ListFilesTool::new(ws.clone())),
            Arc::new(TreeFilesTool::new(ws.clone())),
            Arc::new(SeekFilesTool::new(ws.clone())),
            Arc::new(GrepFilesTool::new(ws.clone())),
            Arc::new(MessageTool::new()),
            Arc::new(CreateFileTool::new(ws.clone())),
            Arc::new(UpdateFileTool::new(ws.clone())),
            Arc::new(ExecuteCommandTool::new(
                ws,
                settings.command_timeout,
                settings.max_output_bytes,
            )),
            Arc::new(PlanProposalTool::new()),
            Arc::new(RecommendCompleteTool::new()),
            Arc::new(VerdictTool::approve()),
            Arc::new(VerdictTool::reject()),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let Some(tool) = self.get(&command.tool) else {
            warn!(tool = %command.tool, "Execution requested for unknown tool");
            return ToolResult::error(command, format!("Unknown tool: {}", command.tool));
        };

        debug!(tool = %command.tool, args = command.args.len(), "Executing tool");
        let result = tool.execute(command).await;
        debug!(tool = %command.tool, outcome = %result.outcome, "Tool finished");
        result
    }
}
