//! Progress reporting for the propose → audit → verify loop

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use magi_application::PhaseProgressNotifier;
use magi_domain::core::string::truncate;
use magi_domain::{Command, Phase, Plan, ProgressMarker, RejectionRecord, Role, ToolResult};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Lines of a rejection reason or tool detail echoed to the console.
const MAX_ECHO_LINES: usize = 5;

/// Reports orchestration progress with a spinner and colored event lines.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: false,
        }
    }

    /// Also echo tool output, proposal descriptions and plan tables.
    pub fn verbose() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: true,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_emoji(phase: Phase) -> &'static str {
        match phase {
            Phase::Planning => "📝",
            Phase::Execution => "⚡",
        }
    }

    fn phase_name(phase: Phase) -> &'static str {
        match phase {
            Phase::Planning => "Planning",
            Phase::Execution => "Execution",
        }
    }

    /// Print a line without tearing the spinner.
    fn line(&self, text: String) {
        let guard = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(pb) => pb.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    fn set_message(&self, message: String) {
        let guard = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            pb.set_message(message);
        }
    }

    fn finish_spinner(&self) {
        let mut guard = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn echo_block(&self, text: &str, indent: &str) {
        for line in text.lines().take(MAX_ECHO_LINES) {
            self.line(format!("{}{}", indent, line.dimmed()));
        }
        if text.lines().count() > MAX_ECHO_LINES {
            self.line(format!("{}{}", indent, "...".dimmed()));
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// `[done/total]` for a plan, if it parses.
pub(crate) fn plan_progress(plan: &str) -> Option<(usize, usize)> {
    let plan = Plan::parse(plan).ok()?;
    let done = plan
        .tasks()
        .iter()
        .filter(|t| t.status == ProgressMarker::Done)
        .count();
    Some((done, plan.tasks().len()))
}

impl PhaseProgressNotifier for ConsoleProgress {
    fn on_phase_start(&self, phase: Phase, resumed: bool) {
        self.finish_spinner();

        let suffix = if resumed { " (resumed)" } else { "" };
        println!();
        println!(
            "{} {}{}",
            Self::phase_emoji(phase),
            Self::phase_name(phase).bold(),
            suffix.dimmed()
        );

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::phase_name(phase));
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_thinking(&self, role: Role) {
        self.set_message(format!("{} is thinking...", role.display_name()));
    }

    fn on_proposal(&self, command: &Command) {
        self.line(format!(
            "  {} {} {}",
            "→".blue(),
            command.tool.cyan(),
            truncate(&command.execution_summary, 80)
        ));
        if self.verbose {
            self.echo_block(&command.execution_description, "      ");
        }
    }

    fn on_verdict(&self, role: Role, verdict: &Command) {
        let reason = truncate(verdict.reason(), 80);
        if verdict.is_approval() {
            self.line(format!(
                "    {} {} {}",
                "✓".green(),
                format!("{} approved", role.display_name()).green(),
                reason.dimmed()
            ));
        } else {
            self.line(format!(
                "    {} {}",
                "✗".red(),
                format!("{} rejected", role.display_name()).red()
            ));
        }
    }

    fn on_rejection(&self, rejection: &RejectionRecord) {
        if rejection.rejected_command.is_none() {
            self.line(format!(
                "    {} {}",
                "ℹ".yellow(),
                "Response was not well-formed".yellow()
            ));
        }
        self.line(format!(
            "    {} {}",
            "ℹ".yellow(),
            rejection.reason.execution_summary.yellow()
        ));
        for line in rejection.reason.reason().lines().take(MAX_ECHO_LINES) {
            self.line(format!("      {}", line.yellow()));
        }
    }

    fn on_tool_result(&self, role: Role, result: &ToolResult) {
        let who = if role == Role::Proposer {
            String::new()
        } else {
            format!("[{}] ", role.display_name())
        };
        if result.is_success() {
            self.line(format!(
                "      {} {}{} {}",
                "🔧".dimmed(),
                who.dimmed(),
                result.tool_name().green(),
                truncate(&result.display_message, 80).dimmed()
            ));
        } else {
            self.line(format!(
                "      {} {}{} {}",
                "🔧".dimmed(),
                who.dimmed(),
                result.tool_name().red(),
                truncate(&result.display_message, 80).red()
            ));
        }
        if self.verbose
            && let Some(detail) = &result.detail
        {
            self.echo_block(detail, "         ");
        }
    }

    fn on_plan_update(&self, plan: &str) {
        if let Some((done, total)) = plan_progress(plan) {
            self.set_message(format!("[{}/{} tasks done]", done, total));
        }
        if self.verbose {
            for line in plan.lines() {
                self.line(format!("    {}", line.dimmed()));
            }
        }
    }

    fn on_reasoning_failure(&self, role: Role, message: &str, consecutive: u32, threshold: u32) {
        self.line(format!(
            "    {} {} ({}/{}): {}",
            "⚠".yellow(),
            format!("{} reasoning failed", role.display_name()).yellow(),
            consecutive,
            threshold,
            truncate(message, 120)
        ));
    }

    fn on_fatal(&self, message: &str) {
        self.line(format!("  {} {}", "✗".red().bold(), message.red().bold()));
    }

    fn on_phase_complete(&self, phase: Phase, _result: &str) {
        self.finish_spinner();
        println!(
            "✅ {}",
            format!("{} approved by the Verifier", Self::phase_name(phase))
                .green()
                .bold()
        );
    }

    fn on_phase_cancelled(&self, phase: Phase) {
        self.finish_spinner();
        println!(
            "❌ {}",
            format!("{} cancelled", Self::phase_name(phase)).red().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_progress() {
        let plan = "| # | Task | Tool | Status |\n|---|---|---|---|\n\
                    | 1 | a | readFile | done |\n\
                    | 2 | b | updateFile | in-progress |\n\
                    | 3 | c | executeCommand | |\n";
        assert_eq!(plan_progress(plan), Some((1, 3)));
        assert_eq!(plan_progress("not a table"), None);
    }

    #[test]
    fn test_events_without_spinner_do_not_panic() {
        let progress = ConsoleProgress::verbose();
        let cmd = Command::new("readFile", vec!["a.rs".into()], "Read a.rs", "line1\nline2");
        progress.on_thinking(Role::Proposer);
        progress.on_proposal(&cmd);
        progress.on_tool_result(
            Role::Auditor,
            &ToolResult::success(&cmd, "Read a.rs").with_detail("fn main() {}"),
        );
        progress.on_rejection(&RejectionRecord::synthetic(
            None,
            "Malformed response",
            "expected JSON",
        ));
        progress.on_reasoning_failure(Role::Verifier, "timeout", 1, 3);
    }
}
