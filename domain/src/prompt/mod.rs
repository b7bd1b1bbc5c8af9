//! Prompt domain
//!
//! The default system prompt and the fixed texts of degraded responses.

mod template;

pub use template::PromptTemplate;
