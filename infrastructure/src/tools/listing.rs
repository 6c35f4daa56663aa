//! Directory tools: listFiles, getTreeFiles

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use magi_domain::tool::catalog;
use magi_domain::{Command, Tool, ToolDefinition, ToolResult};

use super::workspace::{Workspace, is_skipped_dir};

/// Upper bound on entries rendered by either tool.
const MAX_ENTRIES: usize = 2000;

pub struct ListFilesTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl ListFilesTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::list_files(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let raw = command.arg(0).unwrap_or(".");
        let depth = match parse_depth(command.arg(1), 1) {
            Ok(d) => d.max(1),
            Err(e) => return ToolResult::error(command, e),
        };
        let dir = match self.workspace.resolve(raw) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        if !dir.is_dir() {
            return ToolResult::error(command, format!("'{}' is not a directory", raw));
        }

        let shown = self.workspace.relative(&dir);
        match walk(Arc::clone(&self.workspace), dir, depth, false).await {
            Ok(lines) => render(command, &shown, lines),
            Err(e) => ToolResult::error(command, e),
        }
    }
}

pub struct TreeFilesTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl TreeFilesTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::tree_files(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for TreeFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let max_depth = match parse_depth(command.arg(0), 0) {
            Ok(0) => usize::MAX,
            Ok(d) => d,
            Err(e) => return ToolResult::error(command, e),
        };

        let root = self.workspace.root().to_path_buf();
        match walk(Arc::clone(&self.workspace), root, max_depth, true).await {
            Ok(lines) => render(command, ".", lines),
            Err(e) => ToolResult::error(command, e),
        }
    }
}

fn parse_depth(raw: Option<&str>, default: usize) -> Result<usize, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| format!("Invalid depth '{}': expected a non-negative integer", value)),
    }
}

/// Runs [`collect`] on the blocking pool.
async fn walk(
    workspace: Arc<Workspace>,
    dir: PathBuf,
    max_depth: usize,
    skip_hidden: bool,
) -> Result<Vec<String>, String> {
    tokio::task::spawn_blocking(move || {
        let mut lines = Vec::new();
        collect(&workspace, &dir, 1, max_depth, skip_hidden, &mut lines);
        lines
    })
    .await
    .map_err(|e| format!("Directory walk failed: {}", e))
}

/// Depth-first listing, directories suffixed with `/`, sorted by name.
fn collect(
    workspace: &Workspace,
    dir: &Path,
    level: usize,
    max_depth: usize,
    skip_hidden: bool,
    lines: &mut Vec<String>,
) {
    let Ok(read) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = read.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if lines.len() >= MAX_ENTRIES {
            return;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if skip_hidden && is_dir && is_skipped_dir(&name) {
            continue;
        }

        let rel = workspace.relative(&path);
        if is_dir {
            lines.push(format!("{}/", rel));
            if level < max_depth {
                collect(workspace, &path, level + 1, max_depth, skip_hidden, lines);
            }
        } else {
            lines.push(rel);
        }
    }
}

fn render(command: &Command, shown: &str, lines: Vec<String>) -> ToolResult {
    if lines.is_empty() {
        return ToolResult::success(command, format!("{} is empty", shown))
            .with_detail("(empty directory)");
    }
    let count = lines.len();
    let mut detail = lines.join("\n");
    if count >= MAX_ENTRIES {
        detail.push_str(&format!("\n... (limited to {} entries)", MAX_ENTRIES));
    }
    ToolResult::success(command, format!("Listed {} entries under {}", count, shown))
        .with_detail(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cmd(tool: &str, args: &[&str]) -> Command {
        Command::new(
            tool,
            args.iter().map(|s| s.to_string()).collect(),
            "summary",
            "description",
        )
    }

    fn fixture() -> (tempfile::TempDir, Arc<Workspace>) {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/nested/deep.rs"), "").unwrap();
        std::fs::write(dir.path().join(".git/HEAD"), "").unwrap();
        let ws = Arc::new(Workspace::new(dir.path()).unwrap());
        (dir, ws)
    }

    #[tokio::test]
    async fn test_list_files_default_depth() {
        let (_dir, ws) = fixture();
        let tool = ListFilesTool::new(ws);

        let result = tool.execute(&cmd("listFiles", &[])).await;
        assert!(result.is_success());
        let detail = result.detail.unwrap();
        assert!(detail.contains("Cargo.toml"));
        assert!(detail.contains("src/"));
        assert!(!detail.contains("src/lib.rs"));
    }

    #[tokio::test]
    async fn test_list_files_with_depth() {
        let (_dir, ws) = fixture();
        let tool = ListFilesTool::new(ws);

        let result = tool.execute(&cmd("listFiles", &["src", "2"])).await;
        let detail = result.detail.unwrap();
        assert!(detail.contains("src/lib.rs"));
        assert!(detail.contains("src/nested/deep.rs"));
    }

    #[tokio::test]
    async fn test_list_files_invalid_depth() {
        let (_dir, ws) = fixture();
        let tool = ListFilesTool::new(ws);

        let result = tool.execute(&cmd("listFiles", &[".", "deep"])).await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_list_files_outside_workspace() {
        let (_dir, ws) = fixture();
        let tool = ListFilesTool::new(ws);

        let result = tool.execute(&cmd("listFiles", &[".."])).await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_tree_skips_hidden_and_build_dirs() {
        let (_dir, ws) = fixture();
        let tool = TreeFilesTool::new(ws);

        let result = tool.execute(&cmd("getTreeFiles", &[])).await;
        let detail = result.detail.unwrap();
        assert!(detail.contains("src/nested/deep.rs"));
        assert!(!detail.contains(".git"));
        assert!(!detail.contains("target"));
    }

    #[tokio::test]
    async fn test_tree_unlimited_depth_reaches_deep_files() {
        let dir = tempdir().unwrap();
        let mut deep = dir.path().to_path_buf();
        for i in 0..40 {
            deep.push(format!("d{}", i));
        }
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(deep.join("leaf.txt"), "").unwrap();
        let tool = TreeFilesTool::new(Arc::new(Workspace::new(dir.path()).unwrap()));

        let result = tool.execute(&cmd("getTreeFiles", &[])).await;
        assert!(result.is_success());
        assert!(result.detail.unwrap().contains("d39/leaf.txt"));
    }

    #[tokio::test]
    async fn test_tree_max_depth() {
        let (_dir, ws) = fixture();
        let tool = TreeFilesTool::new(ws);

        let result = tool.execute(&cmd("getTreeFiles", &["1"])).await;
        let detail = result.detail.unwrap();
        assert!(detail.contains("src/"));
        assert!(!detail.contains("src/lib.rs"));
    }
}
