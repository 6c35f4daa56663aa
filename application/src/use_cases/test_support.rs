//! Test doubles shared by the orchestrator and driver tests.

use crate::config::SessionParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::PhaseProgressNotifier;
use crate::ports::reasoning::{ReasoningError, ReasoningPort};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use magi_domain::tool::catalog;
use magi_domain::{Command, RejectionRecord, Role, ToolDefinition, ToolResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Params with no cooldown so failure paths run instantly.
pub(crate) fn fast_params() -> SessionParams {
    SessionParams::default().with_failure_cooldown(Duration::ZERO)
}

/// JSON response carrying a command.
pub(crate) fn respond(tool: &str, args: &[&str]) -> String {
    Command::new(
        tool,
        args.iter().map(|a| a.to_string()).collect(),
        format!("{} summary", tool),
        format!("{} description", tool),
    )
    .to_pretty_json()
}

/// JSON response carrying a command and a plan snapshot.
pub(crate) fn respond_with_plan(tool: &str, args: &[&str], plan: &str) -> String {
    Command::new(
        tool,
        args.iter().map(|a| a.to_string()).collect(),
        format!("{} summary", tool),
        format!("{} description", tool),
    )
    .with_plan_snapshot(plan)
    .to_pretty_json()
}

pub(crate) fn approve(reason: &str) -> String {
    respond("approveExecution", &[reason])
}

pub(crate) fn reject(reason: &str) -> String {
    respond("rejectExecution", &[reason])
}

/// Plan table from (tool, status) rows.
pub(crate) fn plan_table(rows: &[(&str, &str)]) -> String {
    let mut text = String::from("| # | Task | Tool | Status |\n|---|------|------|--------|\n");
    for (i, (tool, status)) in rows.iter().enumerate() {
        text.push_str(&format!("| {} | step {} | {} | {} |\n", i + 1, i + 1, tool, status));
    }
    text
}

/// Reasoning port that replays a script and records every prompt.
///
/// An exhausted script answers with `Unavailable`, so a test that runs past
/// its script ends through the failure budget instead of hanging.
pub(crate) struct ScriptedReasoning {
    responses: Mutex<VecDeque<Result<String, ReasoningError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedReasoning {
    pub(crate) fn new(responses: Vec<Result<String, ReasoningError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn ok(responses: Vec<String>) -> Arc<Self> {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ReasoningPort for ScriptedReasoning {
    async fn think(&self, prompt: &str) -> Result<String, ReasoningError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ReasoningError::Unavailable("script exhausted".into())))
    }
}

/// Shared ordered trace of what happened, written by the doubles below.
pub(crate) type Trace = Arc<Mutex<Vec<TraceEvent>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TraceEvent {
    Verdict {
        role: String,
        approved: bool,
        proposal: Command,
    },
    Executed(Command),
}

/// Tool executor over the built-in definitions that records calls instead
/// of touching anything.
pub(crate) struct MockToolExecutor {
    definitions: Vec<ToolDefinition>,
    failures: Mutex<HashMap<String, usize>>,
    trace: Trace,
}

impl MockToolExecutor {
    pub(crate) fn new(trace: Trace) -> Arc<Self> {
        Arc::new(Self {
            definitions: catalog::builtin_definitions(),
            failures: Mutex::new(HashMap::new()),
            trace,
        })
    }

    /// Make the next `times` executions of `tool` return an error outcome.
    pub(crate) fn fail_next(&self, tool: &str, times: usize) {
        self.failures.lock().unwrap().insert(tool.to_string(), times);
    }

    pub(crate) fn executed(&self) -> Vec<Command> {
        self.trace
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Executed(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn executed_tools(&self) -> Vec<String> {
        self.executed().into_iter().map(|c| c.tool).collect()
    }
}

#[async_trait]
impl ToolExecutorPort for MockToolExecutor {
    fn definitions(&self) -> Vec<&ToolDefinition> {
        self.definitions.iter().collect()
    }

    async fn execute(&self, command: &Command) -> ToolResult {
        self.trace
            .lock()
            .unwrap()
            .push(TraceEvent::Executed(command.clone()));

        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(&command.tool)
            && *remaining > 0
        {
            *remaining -= 1;
            return ToolResult::error(command, format!("{} failed", command.tool))
                .with_detail("injected failure");
        }
        ToolResult::success(command, format!("{} ok", command.tool)).with_detail("output")
    }
}

/// Conversation logger that writes verdicts into the shared trace.
pub(crate) struct TraceLogger {
    trace: Trace,
}

impl TraceLogger {
    pub(crate) fn new(trace: Trace) -> Arc<Self> {
        Arc::new(Self { trace })
    }
}

impl ConversationLogger for TraceLogger {
    fn log(&self, event: ConversationEvent) {
        if event.event_type != "verdict" {
            return;
        }
        let Ok(proposal) = serde_json::from_value(event.payload["proposal"].clone()) else {
            return;
        };
        self.trace.lock().unwrap().push(TraceEvent::Verdict {
            role: event.payload["role"].as_str().unwrap_or_default().to_string(),
            approved: event.payload["approved"].as_bool().unwrap_or(false),
            proposal,
        });
    }
}

/// Progress notifier that keeps what the user would have seen.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub rejections: Mutex<Vec<RejectionRecord>>,
    pub failures: Mutex<Vec<(Role, String, u32)>>,
    pub fatal: Mutex<Vec<String>>,
    pub plans: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn last_plan(&self) -> Option<String> {
        self.plans.lock().unwrap().last().cloned()
    }
}

impl PhaseProgressNotifier for RecordingProgress {
    fn on_rejection(&self, rejection: &RejectionRecord) {
        self.rejections.lock().unwrap().push(rejection.clone());
    }

    fn on_plan_update(&self, plan: &str) {
        self.plans.lock().unwrap().push(plan.to_string());
    }

    fn on_reasoning_failure(&self, role: Role, message: &str, consecutive: u32, _threshold: u32) {
        self.failures
            .lock()
            .unwrap()
            .push((role, message.to_string(), consecutive));
    }

    fn on_fatal(&self, message: &str) {
        self.fatal.lock().unwrap().push(message.to_string());
    }
}
