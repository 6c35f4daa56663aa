//! Configuration file loading for magi
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MAGI_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./magi.toml` or `./.magi.toml`
//! 4. Global: `~/.config/magi/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentsConfig, FileConfig, FileLoggingConfig, FileReasoningConfig,
    FileSessionConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
