//! Command protocol: the single message format every agent emits.
//!
//! - [`entities::Command`]: tool name, ordered string args, summaries and
//!   the optional plan snapshot carried by the Proposer during Execution
//! - [`parsing`]: strict parser from raw reasoning output
//!
//! Parsing is syntactic only. Whether the tool is permitted for the emitting
//! role is decided by the tool registry.

pub mod entities;
pub mod parsing;

pub use entities::Command;
pub use parsing::{CommandParseError, parse_command, parse_command_for};
