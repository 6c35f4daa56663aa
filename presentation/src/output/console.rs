//! Console output formatter for session outcomes

use crate::cli::commands::OutputFormat;
use colored::Colorize;
use magi_application::{CancelReason, SessionOutcome};
use std::path::Path;

/// Formats a finished session for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the outcome. `snapshot_path` is where a cancelled session was
    /// saved, if it was.
    pub fn format(
        outcome: &SessionOutcome,
        format: OutputFormat,
        snapshot_path: Option<&Path>,
    ) -> String {
        match outcome {
            SessionOutcome::Completed { plan, summary } => match format {
                OutputFormat::Full => Self::format_completed(plan, summary),
                OutputFormat::Summary => format!("{}\n", summary.trim_end()),
            },
            SessionOutcome::Cancelled { snapshot, reason } => {
                Self::format_cancelled(reason, snapshot.phase.as_str(), snapshot_path)
            }
        }
    }

    fn format_completed(plan: &str, summary: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Request Complete"));
        output.push('\n');

        output.push_str(&Self::section_header("Plan"));
        output.push_str(plan.trim_end());
        output.push('\n');

        output.push_str(&Self::section_header("Summary"));
        output.push_str(summary.trim_end());
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    fn format_cancelled(reason: &CancelReason, phase: &str, snapshot_path: Option<&Path>) -> String {
        let mut output = String::new();
        let title = match reason {
            CancelReason::Requested => "Session cancelled".yellow().bold(),
            CancelReason::Fatal(_) => "Session aborted".red().bold(),
        };
        output.push_str(&format!("\n{} during {}\n", title, phase));
        if let CancelReason::Fatal(message) = reason {
            output.push_str(&format!("{} {}\n", "Reason:".bold(), message));
        }
        if let Some(path) = snapshot_path {
            output.push_str(&format!(
                "{} {}\n{}\n",
                "State saved to".dimmed(),
                path.display(),
                "Continue with: magi --resume".dimmed()
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::{Phase, PhaseSnapshot};

    #[test]
    fn test_completed_full_includes_plan_and_summary() {
        let outcome = SessionOutcome::Completed {
            plan: "| # | Task | Tool | Status |".into(),
            summary: "Added the flag".into(),
        };
        let text = ConsoleFormatter::format(&outcome, OutputFormat::Full, None);
        assert!(text.contains("| # | Task | Tool | Status |"));
        assert!(text.contains("Added the flag"));
    }

    #[test]
    fn test_completed_summary_only() {
        let outcome = SessionOutcome::Completed {
            plan: "the plan".into(),
            summary: "Added the flag\n".into(),
        };
        let text = ConsoleFormatter::format(&outcome, OutputFormat::Summary, None);
        assert_eq!(text, "Added the flag\n");
    }

    #[test]
    fn test_cancelled_mentions_snapshot() {
        let outcome = SessionOutcome::Cancelled {
            snapshot: PhaseSnapshot::new(Phase::Execution, "req", "plan"),
            reason: CancelReason::Fatal("3 consecutive reasoning failures".into()),
        };
        let text = ConsoleFormatter::format(
            &outcome,
            OutputFormat::Full,
            Some(Path::new(".magi/snapshot.json")),
        );
        assert!(text.contains("during execution"));
        assert!(text.contains("3 consecutive reasoning failures"));
        assert!(text.contains(".magi/snapshot.json"));
        assert!(text.contains("magi --resume"));
    }
}
