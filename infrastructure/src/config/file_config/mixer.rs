//! Mixer configuration from TOML (`[mixer]` section)

use chorus_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use chorus_domain::{AgreementRule, DomainError, MixStrategy, MixerConfig, PriorityOrder};
use serde::{Deserialize, Serialize};

/// Raw mixer configuration from TOML
///
/// # Example
///
/// ```toml
/// [mixer]
/// strategy = "vote"              # "best_parts", "average" or "vote"
/// vote_rule = "majority"         # "majority", "unanimous", "atleast:N", "N%"
/// redundancy_threshold = 0.6
/// vote_similarity = 0.5
/// max_units = 12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMixerConfig {
    pub strategy: String,
    pub redundancy_threshold: f64,
    pub vote_similarity: f64,
    pub vote_rule: String,
    pub max_units: usize,
}

impl Default for FileMixerConfig {
    fn default() -> Self {
        let defaults = MixerConfig::default();
        Self {
            strategy: defaults.strategy.to_string(),
            redundancy_threshold: defaults.redundancy_threshold,
            vote_similarity: defaults.vote_similarity,
            vote_rule: defaults.vote_rule.as_config_str(),
            max_units: defaults.max_units,
        }
    }
}

impl FileMixerConfig {
    /// Convert into a validated domain config
    ///
    /// Fails with [`DomainError::UnknownStrategy`] for an unknown strategy name.
    pub fn to_mixer_config(&self, priority: PriorityOrder) -> Result<MixerConfig, DomainError> {
        let config = MixerConfig {
            strategy: self.strategy.parse()?,
            redundancy_threshold: self.redundancy_threshold,
            vote_similarity: self.vote_similarity,
            vote_rule: self.vote_rule.parse()?,
            max_units: self.max_units,
            priority,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.strategy.parse::<MixStrategy>().is_err() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "mixer.strategy".to_string(),
                    value: self.strategy.clone(),
                    valid_values: MixStrategy::all().iter().map(|s| s.to_string()).collect(),
                },
                format!("mixer.strategy: unknown strategy '{}'", self.strategy),
            ));
        }

        if self.vote_rule.parse::<AgreementRule>().is_err() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "mixer.vote_rule".to_string(),
                    value: self.vote_rule.clone(),
                    valid_values: vec![
                        "majority".to_string(),
                        "unanimous".to_string(),
                        "atleast:N".to_string(),
                        "N%".to_string(),
                    ],
                },
                format!("mixer.vote_rule: unknown rule '{}'", self.vote_rule),
            ));
        }

        for (field, value) in [
            ("mixer.redundancy_threshold", self.redundancy_threshold),
            ("mixer.vote_similarity", self.vote_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                    format!("{}: {} is outside [0, 1]", field, value),
                ));
            }
        }

        if self.max_units == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "mixer.max_units".to_string(),
                    value: "0".to_string(),
                },
                "mixer.max_units must be at least 1",
            ));
        }

        issues
    }
}
