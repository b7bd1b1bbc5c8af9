//! Structured configuration issues.
//!
//! Configuration is checked once at startup. Each problem is reported as a
//! [`ConfigIssue`]; any issue with [`Severity::Error`] aborts startup, while
//! warnings are logged and the configuration is used as is.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field holds a value outside its accepted set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is out of range.
    OutOfRange { field: String, value: String },
    /// A field names a backend that is not configured.
    UnknownBackend { field: String, name: String },
    /// No backend is enabled.
    NoBackends,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let e = ConfigIssue::error(ConfigIssueCode::NoBackends, "no backends");
        assert!(e.is_error());
        let w = ConfigIssue::warning(
            ConfigIssueCode::UnknownBackend {
                field: "router.priority".into(),
                name: "mistral".into(),
            },
            "unknown backend",
        );
        assert!(!w.is_error());
        assert_eq!(w.to_string(), "unknown backend");
    }
}
