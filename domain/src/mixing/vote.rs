//! `vote` fusion: keep the claims enough responses agree on
//!
//! Claims are the prose units of each response. Support for a claim is the
//! number of responses holding at least one similar unit, its own response
//! included.

use super::best_parts::ranked_sources;
use super::rule::AgreementRule;
use super::text::{TextUnit, UnitKind, jaccard, render, segment};
use crate::orchestration::value_objects::ModelAnswer;
use crate::routing::PriorityOrder;
use tracing::debug;

fn claims(text: &str) -> Vec<TextUnit> {
    segment(text)
        .into_iter()
        .filter(|u| u.kind != UnitKind::CodeBlock && u.has_terms())
        .collect()
}

/// Returns `None` when no claim reaches the required support.
pub fn fuse(
    responses: &[ModelAnswer],
    priority: &PriorityOrder,
    similarity_threshold: f64,
    rule: &AgreementRule,
) -> Option<String> {
    let total = responses.len();
    let per_response: Vec<Vec<TextUnit>> = responses.iter().map(|r| claims(&r.text)).collect();

    let mut retained: Vec<TextUnit> = Vec::new();
    for index in ranked_sources(responses, priority) {
        for claim in &per_response[index] {
            let already_kept = retained
                .iter()
                .any(|kept| jaccard(&kept.terms, &claim.terms) >= similarity_threshold);
            if already_kept {
                continue;
            }

            let support = per_response
                .iter()
                .filter(|units| {
                    units
                        .iter()
                        .any(|u| jaccard(&u.terms, &claim.terms) >= similarity_threshold)
                })
                .count();

            if rule.is_satisfied(support, total) {
                debug!(
                    backend = %responses[index].backend,
                    support,
                    total,
                    "vote retained claim"
                );
                retained.push(claim.clone());
            }
        }
    }

    if retained.is_empty() {
        None
    } else {
        Some(render(&retained))
    }
}
