//! Presentation layer for magi
//!
//! This crate contains the CLI definition, the console progress reporter
//! and the formatter for finished sessions.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::ConsoleProgress;
