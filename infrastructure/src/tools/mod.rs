//! Tool implementations
//!
//! Concrete executors for every tool in the built-in catalog, plus the
//! [`ToolRegistry`] that dispatches commands to them. All file-system tools
//! are confined to a [`Workspace`] root.

pub mod command;
pub mod file;
pub mod listing;
pub mod protocol;
pub mod search;
pub mod workspace;

mod registry;

pub use registry::{RegistryError, ToolRegistry};
pub use workspace::Workspace;

use std::time::Duration;

/// Default shell command timeout
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Default cap on captured shell output (1 MB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Runtime limits for the shell tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub command_timeout: Duration,
    pub max_output_bytes: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}
