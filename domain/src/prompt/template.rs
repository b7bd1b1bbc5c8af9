//! Prompt and fixed-message templates

use crate::orchestration::value_objects::BackendFailure;

/// Templates for prompts sent to backends and for degraded responses
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt used when a caller does not supply one
    pub fn default_system() -> &'static str {
        "You are a helpful assistant that provides accurate, concise, and useful information."
    }

    /// Text of the degraded response for a blank message
    pub fn no_message() -> &'static str {
        "No message provided"
    }

    /// Degraded response text when every consulted backend failed
    ///
    /// Lists one line per backend, in invocation order.
    pub fn all_backends_failed<'a>(
        failures: impl IntoIterator<Item = (&'a str, &'a BackendFailure)>,
    ) -> String {
        let mut text = String::from("No backend could answer this query:");
        let mut any = false;
        for (backend, failure) in failures {
            text.push_str(&format!("\n- {}: {}", backend, failure));
            any = true;
        }
        if !any {
            text.push_str("\n- no backend was consulted");
        }
        text
    }
}
