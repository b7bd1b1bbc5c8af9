//! Output formatter trait

use super::console::{ConsoleFormatter, JsonFormatter};
use chorus_domain::{FinalResponse, OutputFormat};

/// Trait for formatting answers
pub trait OutputFormatter {
    fn format(&self, response: &FinalResponse) -> String;
}

/// Pick the formatter for a configured output format
pub fn formatter_for(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter::new(color)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
