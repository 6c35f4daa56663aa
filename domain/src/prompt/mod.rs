//! Prompt domain
//!
//! Role prompts for the propose → audit → verify protocol, plus the shared
//! renderers for tool lists, histories and rejections.

pub mod role;
mod sections;

pub use role::{ProposerPrompt, ReviewPrompt, RolePromptTemplate};
