//! Search tools: seekFiles, grepFiles

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use glob::glob;
use magi_domain::core::string::truncate;
use magi_domain::tool::catalog;
use magi_domain::{Command, Tool, ToolDefinition, ToolResult};
use regex::Regex;

use super::workspace::{Workspace, is_skipped_dir};

/// Maximum number of results to return
const MAX_RESULTS: usize = 1000;

/// Maximum file size for grep (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Longest matched line echoed back
const MAX_LINE_LEN: usize = 300;

pub struct SeekFilesTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl SeekFilesTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::seek_files(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for SeekFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let pattern = match command.require_arg(0, "globPattern") {
            Ok(p) => p.trim(),
            Err(e) => return ToolResult::error(command, e),
        };
        if Path::new(pattern).is_absolute() || pattern.split('/').any(|s| s == "..") {
            return ToolResult::error(
                command,
                format!("Glob pattern '{}' must stay inside the workspace", pattern),
            );
        }

        let root = self.workspace.root();
        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&root.display().to_string()),
            pattern.trim_start_matches("./")
        );
        let entries = match glob(&full_pattern) {
            Ok(paths) => paths,
            Err(e) => {
                return ToolResult::error(command, format!("Invalid glob pattern: {}", e));
            }
        };

        let workspace = Arc::clone(&self.workspace);
        let collected = tokio::task::spawn_blocking(move || {
            let mut results = Vec::new();
            let mut error_count = 0;
            for entry in entries {
                if results.len() >= MAX_RESULTS {
                    break;
                }
                match entry {
                    Ok(path) => {
                        let rel = workspace.relative(&path);
                        if !in_skipped_dir(&rel) {
                            results.push(rel);
                        }
                    }
                    Err(_) => error_count += 1,
                }
            }
            (results, error_count)
        })
        .await;
        let (results, error_count) = match collected {
            Ok(found) => found,
            Err(e) => return ToolResult::error(command, format!("File search failed: {}", e)),
        };

        if results.is_empty() {
            return ToolResult::success(command, "No files found matching the pattern");
        }

        let count = results.len();
        let mut detail = results.join("\n");
        if count >= MAX_RESULTS {
            detail.push_str(&format!("\n... (limited to {} results)", MAX_RESULTS));
        }
        if error_count > 0 {
            detail.push_str(&format!("\n({} paths could not be accessed)", error_count));
        }
        ToolResult::success(command, format!("Found {} files matching '{}'", count, pattern))
            .with_detail(detail)
    }
}

pub struct GrepFilesTool {
    definition: ToolDefinition,
    workspace: Arc<Workspace>,
}

impl GrepFilesTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            definition: catalog::grep_files(),
            workspace,
        }
    }
}

#[async_trait]
impl Tool for GrepFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        let pattern = match command.require_arg(0, "pattern") {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        let regex = match Regex::new(pattern) {
            Ok(r) => r,
            Err(e) => return ToolResult::error(command, format!("Invalid regex pattern: {}", e)),
        };
        let raw_dir = command.arg(1).unwrap_or(".");
        let start = match self.workspace.resolve(raw_dir) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(command, e),
        };
        if !start.exists() {
            return ToolResult::error(command, format!("Path not found: {}", raw_dir));
        }

        let workspace = Arc::clone(&self.workspace);
        let scanned =
            tokio::task::spawn_blocking(move || scan(&workspace, start, &regex)).await;
        let (matches, files_matched) = match scanned {
            Ok(found) => found,
            Err(e) => return ToolResult::error(command, format!("Search failed: {}", e)),
        };

        if matches.is_empty() {
            return ToolResult::success(command, format!("No matches for '{}'", pattern));
        }

        let count = matches.len();
        let mut detail = matches.join("\n");
        if count >= MAX_RESULTS {
            detail.push_str(&format!("\n... (limited to {} matches)", MAX_RESULTS));
        }
        ToolResult::success(
            command,
            format!("{} matches in {} files for '{}'", count, files_matched, pattern),
        )
        .with_detail(detail)
    }
}

/// Matching lines as `path:line: text`, plus the number of files that matched.
fn scan(workspace: &Workspace, start: PathBuf, regex: &Regex) -> (Vec<String>, usize) {
    let mut files = Vec::new();
    if start.is_file() {
        files.push(start);
    } else {
        walk_files(&start, &mut files);
    }

    let mut matches = Vec::new();
    let mut files_matched = 0;
    'files: for file in &files {
        let Ok(meta) = fs::metadata(file) else {
            continue;
        };
        if meta.len() > MAX_GREP_FILE_SIZE {
            continue;
        }
        // Binary or non-UTF-8 files are skipped
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };

        let rel = workspace.relative(file);
        let mut hit = false;
        for (idx, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                hit = true;
                matches.push(format!(
                    "{}:{}: {}",
                    rel,
                    idx + 1,
                    truncate(line.trim_end(), MAX_LINE_LEN)
                ));
                if matches.len() >= MAX_RESULTS {
                    files_matched += 1;
                    break 'files;
                }
            }
        }
        if hit {
            files_matched += 1;
        }
    }
    (matches, files_matched)
}

fn walk_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(read) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = read.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !is_skipped_dir(&entry.file_name().to_string_lossy()) {
                walk_files(&path, files);
            }
        } else if file_type.is_file() {
            files.push(path);
        }
    }
}

fn in_skipped_dir(rel: &str) -> bool {
    let mut parts: Vec<&str> = rel.split('/').collect();
    parts.pop();
    parts.into_iter().any(is_skipped_dir)
}
