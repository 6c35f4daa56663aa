//! Core domain concepts shared across all subdomains.
//!
//! - [`role::Role`]: the three orchestration roles
//! - [`role::Phase`]: Planning or Execution
//! - [`string`]: UTF-8 safe truncation helpers

pub mod role;
pub mod string;
