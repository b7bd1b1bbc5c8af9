//! Console and JSON formatters for answers

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use chorus_domain::FinalResponse;

/// Formats answers for terminal display
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    color: bool,
}

impl ConsoleFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// The answer text followed by a "models used" footer
    pub fn format_response(&self, response: &FinalResponse) -> String {
        let mut output = String::new();
        output.push_str(&response.text);
        output.push_str("\n\n");

        let footer = if response.is_degraded() {
            "Models used: none".to_string()
        } else {
            format!("Models used: {}", response.models_used.join(", "))
        };

        if !self.color {
            output.push_str(&footer);
        } else if response.is_degraded() {
            output.push_str(&footer.yellow().to_string());
        } else {
            output.push_str(&footer.dimmed().to_string());
        }
        output
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, response: &FinalResponse) -> String {
        self.format_response(response)
    }
}

/// Formats answers as `{"message": ..., "models_used": [...]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_json(response: &FinalResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, response: &FinalResponse) -> String {
        Self::format_json(response)
    }
}
