//! Output format value object

use serde::{Deserialize, Serialize};

/// How an answer is rendered for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Answer text followed by a "models used" footer (default)
    #[default]
    Text,
    /// `{"message": ..., "models_used": [...]}`
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
        let format: OutputFormat = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(format, OutputFormat::Text);
    }
}
