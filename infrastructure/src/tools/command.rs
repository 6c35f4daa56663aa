//! Shell tool: executeCommand

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use magi_domain::core::string::truncate_str;
use magi_domain::tool::catalog;
use magi_domain::{Command, Tool, ToolDefinition, ToolResult};
use tokio::process::Command as Process;
use tracing::debug;

use super::workspace::Workspace;

pub struct ExecuteCommandTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
    timeout: Duration,
    max_output_bytes: usize,
}

impl ExecuteCommandTool {
    pub fn new(workspace: Arc<Workspace>, timeout: Duration, max_output_bytes: usize) -> Self {
        Self {
            definition: catalog::execute_command(),
            workspace,
            timeout,
            max_output_bytes,
        }
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let line = match command.require_arg(0, "command") {
            Ok(c) => c,
            Err(e) => return ToolResult::error(command, e),
        };

        let mut process = Process::new("sh");
        process
            .args(["-c", line])
            .current_dir(self.workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let child = match process.spawn() {
            Ok(c) => c,
            Err(e) => {
                return ToolResult::error(command, format!("Failed to spawn command: {}", e));
            }
        };

        // Dropping the future on timeout kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return ToolResult::error(command, format!("Failed to wait for command: {}", e));
            }
            Err(_) => {
                return ToolResult::error(
                    command,
                    format!("Command timed out after {} seconds", self.timeout.as_secs()),
                );
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(
            command = line,
            exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "Shell command finished"
        );

        let combined = combine_output(&output.stdout, &output.stderr, self.max_output_bytes);
        if output.status.success() {
            ToolResult::success(command, format!("Command succeeded: {}", line)).with_detail(combined)
        } else {
            ToolResult::error(command, format!("Command exited with code {}: {}", exit_code, line))
                .with_detail(combined)
        }
    }
}

/// Join stdout and stderr, truncating to `limit` bytes.
fn combine_output(stdout: &[u8], stderr: &[u8], limit: usize) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);

    let mut combined = String::new();
    if !stdout.is_empty() {
        combined.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }

    if combined.len() > limit {
        let mut cut = truncate_str(&combined, limit).to_string();
        cut.push_str("\n... (output truncated)");
        return cut;
    }
    combined
}
