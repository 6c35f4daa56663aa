//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What to print once a session completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Approved plan followed by the completion summary
    Full,
    /// Only the completion summary
    Summary,
}

/// CLI arguments for magi
#[derive(Parser, Debug)]
#[command(name = "magi")]
#[command(author, version, about = "Propose, audit, verify - a gated three-agent coding assistant")]
#[command(long_about = r#"
magi turns a natural-language request into changes in your workspace
through three agents that must agree at every step:

1. Proposer: decides the next action and emits it as a command
2. Auditor:  must approve every command before it runs
3. Verifier: must approve the whole history before a phase ends

A session runs a Planning phase (produces a task table) and then an
Execution phase (works through the table one task at a time).

Press Ctrl-C to cancel. The interrupted phase is saved and can be
continued with --resume.

Configuration files are loaded from (in priority order):
1. MAGI_* environment variables (e.g. MAGI_REASONING__MODEL=o3)
2. --config <path>              Explicit config file
3. ./magi.toml or ./.magi.toml  Project-level config
4. ~/.config/magi/config.toml   Global config

Example:
  magi "Add a --json flag to the report command"
  magi --workspace ../service "Fix the failing integration test"
  magi --resume
"#)]
pub struct Cli {
    /// What the agents should accomplish
    #[arg(required_unless_present_any = ["resume", "show_config"])]
    pub request: Option<String>,

    /// Continue the session saved by a previous cancellation
    #[arg(long, conflicts_with = "request")]
    pub resume: bool,

    /// Snapshot file to write on cancellation and read with --resume
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Directory the tools operate in (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request() {
        let cli = Cli::try_parse_from(["magi", "-vv", "add a test"]).unwrap();
        assert_eq!(cli.request.as_deref(), Some("add a test"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(!cli.resume);
    }

    #[test]
    fn test_request_required() {
        assert!(Cli::try_parse_from(["magi"]).is_err());
    }

    #[test]
    fn test_resume_without_request() {
        let cli = Cli::try_parse_from(["magi", "--resume", "--snapshot", "s.json"]).unwrap();
        assert!(cli.resume);
        assert_eq!(cli.snapshot, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_resume_conflicts_with_request() {
        assert!(Cli::try_parse_from(["magi", "--resume", "do things"]).is_err());
    }

    #[test]
    fn test_show_config_alone() {
        let cli = Cli::try_parse_from(["magi", "--show-config"]).unwrap();
        assert!(cli.show_config);
    }

    #[test]
    fn test_workspace_and_output() {
        let cli = Cli::try_parse_from(["magi", "-w", "/tmp/ws", "-o", "summary", "go"]).unwrap();
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/ws")));
        assert_eq!(cli.output, OutputFormat::Summary);
    }
}
