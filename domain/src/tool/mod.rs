//! Tool domain: definitions, capability matrix, results and the tool trait
//!
//! - [`entities`]: [`ToolDefinition`](entities::ToolDefinition) and the
//!   [`ToolKind`](entities::ToolKind) capability matrix
//! - [`value_objects`]: [`ToolResult`](value_objects::ToolResult) and
//!   [`ExecutionHistory`](value_objects::ExecutionHistory)
//! - [`traits`]: the [`Tool`](traits::Tool) interface every tool implements
//! - [`catalog`]: definitions of the built-in tools
//! - [`names`]: wire names

pub mod catalog;
pub mod entities;
pub mod names;
pub mod traits;
pub mod value_objects;
