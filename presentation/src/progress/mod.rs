//! Console progress reporting

mod console;

pub use console::ConsoleProgress;
