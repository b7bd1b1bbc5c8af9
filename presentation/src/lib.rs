//! Presentation layer for chorus
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and interactive chat interface.

pub mod chat;
pub mod cli;
pub mod interrupt;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use interrupt::answer_until_interrupted;
pub use output::console::{ConsoleFormatter, JsonFormatter};
pub use output::formatter::{OutputFormatter, formatter_for};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
