//! Agreement rules for the vote strategy
//!
//! A claim survives voting when the number of responses that contain a
//! similar claim satisfies the configured rule.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rule for deciding whether enough responses agree on a claim
///
/// # Example
///
/// ```
/// use chorus_domain::mixing::AgreementRule;
///
/// let rule = AgreementRule::Majority;
/// assert!(rule.is_satisfied(2, 3));  // 2/3 > 50%
/// assert!(!rule.is_satisfied(1, 3)); // 1/3 < 50%
///
/// let strict = AgreementRule::Unanimous;
/// assert!(strict.is_satisfied(3, 3));
/// assert!(!strict.is_satisfied(2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgreementRule {
    /// More than half of the responses
    #[default]
    Majority,

    /// Every response
    Unanimous,

    /// At least n responses
    AtLeast(usize),

    /// At least this percentage of responses (0-100)
    Percentage(u8),
}

impl AgreementRule {
    /// Check if `supporting` out of `total` responses is enough
    pub fn is_satisfied(&self, supporting: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        supporting >= self.min_support(total)
    }

    /// Minimum number of supporting responses given a total
    pub fn min_support(&self, total: usize) -> usize {
        match self {
            AgreementRule::Majority => total / 2 + 1,
            AgreementRule::Unanimous => total,
            AgreementRule::AtLeast(n) => *n,
            AgreementRule::Percentage(p) => {
                (total as f64 * (*p as f64 / 100.0)).ceil() as usize
            }
        }
    }

    /// Canonical configuration string
    pub fn as_config_str(&self) -> String {
        match self {
            AgreementRule::Majority => "majority".to_string(),
            AgreementRule::Unanimous => "unanimous".to_string(),
            AgreementRule::AtLeast(n) => format!("atleast:{}", n),
            AgreementRule::Percentage(p) => format!("{}%", p),
        }
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            AgreementRule::Majority => "majority (more than half)".to_string(),
            AgreementRule::Unanimous => "unanimous (every response)".to_string(),
            AgreementRule::AtLeast(n) => format!("at least {} responses", n),
            AgreementRule::Percentage(p) => format!("at least {}% of responses", p),
        }
    }
}

impl std::fmt::Display for AgreementRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for AgreementRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DomainError::UnknownAgreementRule(s.to_string());
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(AgreementRule::Majority),
            "unanimous" | "all" => Ok(AgreementRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n = s
                    .split(':')
                    .nth(1)
                    .and_then(|n| n.trim().parse().ok())
                    .ok_or_else(unknown)?;
                Ok(AgreementRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num.trim().parse().map_err(|_| unknown())?;
                if p > 100 {
                    return Err(unknown());
                }
                Ok(AgreementRule::Percentage(p))
            }
            _ => Err(unknown()),
        }
    }
}

impl Serialize for AgreementRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_config_str())
    }
}

impl<'de> Deserialize<'de> for AgreementRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
