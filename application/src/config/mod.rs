//! Application-level configuration.
//!
//! - [`SessionParams`]: failure budget and cooldown for one session

pub mod session_params;

pub use session_params::SessionParams;
