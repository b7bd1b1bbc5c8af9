//! `average` fusion for numeric judgments
//!
//! Applies only when every response is a score. Supported forms:
//!
//! 1. **JSON**: `{"score": 8, "reasoning": "..."}`, optionally inside a code fence
//! 2. **Fraction**: `8/10`, `Score: 7.5/10`
//! 3. **Labelled or bare number**: `Score: 9`, `rating = 4`, `7`

use crate::orchestration::value_objects::ModelAnswer;
use regex::Regex;
use std::sync::OnceLock;

/// A numeric judgment extracted from one response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judgment {
    pub value: f64,
    pub denominator: Option<f64>,
}

fn judgment_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:score|rating|answer)?\s*[:=]?\s*(-?\d+(?:\.\d+)?)\s*(?:/\s*(\d+(?:\.\d+)?))?\s*\.?$",
        )
        .ok()
    })
    .as_ref()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the language tag line, if any
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

/// Parse a response that consists only of a numeric judgment.
///
/// # Examples
///
/// ```
/// use chorus_domain::mixing::average::parse_judgment;
///
/// assert_eq!(parse_judgment(r#"{"score": 8}"#).map(|j| j.value), Some(8.0));
/// assert_eq!(parse_judgment("7/10").and_then(|j| j.denominator), Some(10.0));
/// assert_eq!(parse_judgment("Score: 9").map(|j| j.value), Some(9.0));
/// assert!(parse_judgment("Nine, probably").is_none());
/// ```
pub fn parse_judgment(text: &str) -> Option<Judgment> {
    let body = strip_code_fence(text.trim());

    if body.starts_with('{') {
        let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
        let value = parsed
            .get("score")
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite())?;
        return Some(Judgment {
            value,
            denominator: None,
        });
    }

    let caps = judgment_regex()?.captures(body)?;
    let value = caps
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())?;
    let denominator = match caps.get(2) {
        Some(d) => {
            let d = d.as_str().parse::<f64>().ok()?;
            if d == 0.0 || !d.is_finite() {
                return None;
            }
            Some(d)
        }
        None => None,
    };

    Some(Judgment { value, denominator })
}

/// Two decimals, trailing zeros trimmed
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns `None` unless every response parses as a judgment.
pub fn fuse(responses: &[ModelAnswer]) -> Option<String> {
    let judgments = responses
        .iter()
        .map(|r| parse_judgment(&r.text))
        .collect::<Option<Vec<_>>>()?;
    let first = judgments.first()?;

    let mean = judgments.iter().map(|j| j.value).sum::<f64>() / judgments.len() as f64;

    let shared_denominator = first
        .denominator
        .filter(|d| judgments.iter().all(|j| j.denominator == Some(*d)));

    Some(match shared_denominator {
        Some(d) => format!("{}/{}", format_number(mean), format_number(d)),
        None => format_number(mean),
    })
}
