//! File tools: readFile, createFile, updateFile

use std::sync::Arc;

use async_trait::async_trait;
use magi_domain::tool::catalog;
use magi_domain::{Command, Tool, ToolDefinition, ToolResult};
use tokio::fs;

use super::workspace::Workspace;

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub struct ReadFileTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl ReadFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::read_file(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let raw = match command.require_arg(0, "path") {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        let path = match self.workspace.resolve(raw) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(_) => return ToolResult::error(command, format!("File not found: {}", raw)),
        };
        if !metadata.is_file() {
            return ToolResult::error(command, format!("'{}' is not a file", raw));
        }
        if metadata.len() > MAX_READ_SIZE {
            return ToolResult::error(
                command,
                format!(
                    "File is too large ({} bytes, max {} bytes)",
                    metadata.len(),
                    MAX_READ_SIZE
                ),
            );
        }

        match fs::read(&path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                ToolResult::success(command, format!("Read {}", self.workspace.relative(&path)))
                    .with_detail(content)
            }
            Err(e) => ToolResult::error(command, format!("Failed to read file: {}", e)),
        }
    }
}

pub struct CreateFileTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl CreateFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::create_file(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let raw = match command.require_arg(0, "path") {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        let path = match self.workspace.resolve(raw) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        if path == self.workspace.root() || path.is_dir() {
            return ToolResult::error(command, format!("'{}' is a directory", raw));
        }
        let content = command.arg(1).unwrap_or("");

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            return ToolResult::error(command, format!("Failed to create directories: {}", e));
        }

        let existed = path.exists();
        match fs::write(&path, content).await {
            Ok(()) => {
                let verb = if existed { "Overwrote" } else { "Created" };
                ToolResult::success(
                    command,
                    format!(
                        "{} {} ({} bytes)",
                        verb,
                        self.workspace.relative(&path),
                        content.len()
                    ),
                )
            }
            Err(e) => ToolResult::error(command, format!("Failed to write file: {}", e)),
        }
    }
}

pub struct UpdateFileTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl UpdateFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::update_file(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for UpdateFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let raw = match command.require_arg(0, "path") {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        let Some(content) = command.arg(1) else {
            return ToolResult::error(
                command,
                format!("Missing required argument #2 'content' for tool '{}'", command.tool),
            );
        };
        let path = match self.workspace.resolve(raw) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        if !path.is_file() {
            return ToolResult::error(
                command,
                format!("File not found: {} (use createFile for new files)", raw),
            );
        }

        match fs::write(&path, content).await {
            Ok(()) => ToolResult::success(
                command,
                format!(
                    "Updated {} ({} bytes)",
                    self.workspace.relative(&path),
                    content.len()
                ),
            ),
            Err(e) => ToolResult::error(command, format!("Failed to write file: {}", e)),
        }
    }
}
