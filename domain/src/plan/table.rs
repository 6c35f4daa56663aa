//! Parsing and rendering of the `| # | Task | Tool | Status |` table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const HEADER: [&str; 4] = ["#", "task", "tool", "status"];

/// Progress marker held in a task's Status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressMarker {
    Empty,
    InProgress,
    Audited,
    Done,
}

impl ProgressMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressMarker::Empty => "",
            ProgressMarker::InProgress => "in-progress",
            ProgressMarker::Audited => "audited",
            ProgressMarker::Done => "done",
        }
    }

    fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim().to_ascii_lowercase().as_str() {
            "" => Some(ProgressMarker::Empty),
            "in-progress" | "in progress" => Some(ProgressMarker::InProgress),
            "audited" => Some(ProgressMarker::Audited),
            "done" => Some(ProgressMarker::Done),
            _ => None,
        }
    }
}

impl fmt::Display for ProgressMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressMarker::Empty => write!(f, "(empty)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Plan table header '| # | Task | Tool | Status |' not found")]
    MissingHeader,

    #[error("Plan table header must be followed by a '|---|' separator row")]
    MissingSeparator,

    #[error("Plan table row {row} has {cells} cells, expected 4")]
    MalformedRow { row: usize, cells: usize },

    #[error("Task {number} has unknown status '{marker}' (use empty, in-progress, audited or done)")]
    UnknownMarker { number: String, marker: String },

    #[error("Plan table has no tasks")]
    NoTasks,
}

/// One row of the plan table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTask {
    /// Zero-based position in the table.
    pub index: usize,
    /// Content of the `#` cell.
    pub number: String,
    pub task: String,
    pub tool: String,
    pub status: ProgressMarker,
    line: usize,
}

impl PlanTask {
    /// Same task, ignoring the status cell.
    pub fn same_task(&self, other: &PlanTask) -> bool {
        self.number == other.number && self.task == other.task && self.tool == other.tool
    }

    fn render(&self) -> String {
        format!(
            "| {} | {} | {} | {} |",
            self.number,
            self.task,
            self.tool,
            self.status.as_str()
        )
    }
}

/// A parsed plan. Keeps the original text so that everything outside the
/// table (notes, headings) survives marker updates untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    text: String,
    tasks: Vec<PlanTask>,
}

impl Plan {
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let lines: Vec<&str> = text.lines().collect();

        let header = lines
            .iter()
            .position(|line| is_header(line))
            .ok_or(PlanError::MissingHeader)?;

        match lines.get(header + 1) {
            Some(line) if is_separator(line) => {}
            _ => return Err(PlanError::MissingSeparator),
        }

        let mut tasks = Vec::new();
        for (line_no, line) in lines.iter().enumerate().skip(header + 2) {
            if !line.trim_start().starts_with('|') {
                break;
            }
            let cells = split_row(line);
            if cells.len() != 4 {
                return Err(PlanError::MalformedRow {
                    row: tasks.len() + 1,
                    cells: cells.len(),
                });
            }
            let status =
                ProgressMarker::from_cell(cells[3]).ok_or_else(|| PlanError::UnknownMarker {
                    number: cells[0].to_string(),
                    marker: cells[3].to_string(),
                })?;
            tasks.push(PlanTask {
                index: tasks.len(),
                number: cells[0].to_string(),
                task: cells[1].to_string(),
                tool: cells[2].to_string(),
                status,
                line: line_no,
            });
        }

        if tasks.is_empty() {
            return Err(PlanError::NoTasks);
        }

        Ok(Self {
            text: text.to_string(),
            tasks,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn tasks(&self) -> &[PlanTask] {
        &self.tasks
    }

    /// First task whose marker is empty.
    pub fn next_pending(&self) -> Option<&PlanTask> {
        self.tasks
            .iter()
            .find(|t| t.status == ProgressMarker::Empty)
    }

    pub fn all_empty(&self) -> bool {
        self.tasks.iter().all(|t| t.status == ProgressMarker::Empty)
    }

    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.status == ProgressMarker::Done)
    }

    /// Same tasks with the same markers, regardless of cell padding.
    pub fn same_state(&self, other: &Plan) -> bool {
        self.tasks.len() == other.tasks.len()
            && self
                .tasks
                .iter()
                .zip(&other.tasks)
                .all(|(a, b)| a.same_task(b) && a.status == b.status)
    }

    /// Copy of the plan with one task's status cell rewritten.
    ///
    /// Only the row of that task is re-rendered; an out-of-range index
    /// returns the plan unchanged.
    pub fn with_marker(&self, index: usize, marker: ProgressMarker) -> Plan {
        let mut tasks = self.tasks.clone();
        let Some(task) = tasks.get_mut(index) else {
            return self.clone();
        };
        task.status = marker;
        let target_line = task.line;
        let rendered = task.render();

        let mut lines: Vec<String> = self.text.lines().map(str::to_string).collect();
        if let Some(line) = lines.get_mut(target_line) {
            *line = rendered;
        }
        let mut text = lines.join("\n");
        if self.text.ends_with('\n') {
            text.push('\n');
        }

        Plan { text, tasks }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn split_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn is_header(line: &str) -> bool {
    if !line.trim_start().starts_with('|') {
        return false;
    }
    let cells = split_row(line);
    cells.len() == HEADER.len()
        && cells
            .iter()
            .zip(HEADER)
            .all(|(cell, expected)| cell.eq_ignore_ascii_case(expected))
}

fn is_separator(line: &str) -> bool {
    let cells = split_row(line);
    cells.len() == HEADER.len()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}
