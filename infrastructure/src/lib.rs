//! Infrastructure layer for magi
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP reasoning backend, the concrete
//! tools and their registry, configuration file loading, the JSONL
//! transcript and snapshot persistence.

pub mod config;
pub mod logging;
pub mod reasoning;
pub mod snapshot;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentsConfig, FileConfig, FileLoggingConfig,
    FileReasoningConfig, FileSessionConfig, FileToolsConfig,
};
pub use logging::JsonlConversationLogger;
pub use reasoning::{OpenAiReasoning, build_agents};
pub use snapshot::JsonSnapshotStore;
pub use tools::{RegistryError, ToolRegistry, ToolSettings, Workspace};
