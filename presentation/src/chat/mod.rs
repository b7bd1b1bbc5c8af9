//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for chorus.

mod repl;

pub use repl::ChatRepl;
