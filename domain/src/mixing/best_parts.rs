//! `best_parts` fusion: assemble the most query-relevant, non-redundant units

use super::text::{TextUnit, jaccard, render, segment, significant_terms};
use crate::core::query::Query;
use crate::orchestration::value_objects::ModelAnswer;
use crate::routing::PriorityOrder;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

struct Candidate {
    unit: TextUnit,
    score: f64,
    source_rank: usize,
}

/// Fraction of distinct query terms present in the unit
fn relevance(unit: &TextUnit, query_terms: &BTreeSet<String>) -> f64 {
    if query_terms.is_empty() {
        return 0.0;
    }
    unit.terms.intersection(query_terms).count() as f64 / query_terms.len() as f64
}

/// Source indices ordered from highest to lowest priority
pub(crate) fn ranked_sources(responses: &[ModelAnswer], priority: &PriorityOrder) -> Vec<usize> {
    let mut order: Vec<usize> = (0..responses.len()).collect();
    order.sort_by_key(|&i| priority.rank(&responses[i].backend, i));
    order
}

/// Returns `None` when no unit qualifies.
pub fn fuse(
    responses: &[ModelAnswer],
    query: &Query,
    priority: &PriorityOrder,
    redundancy_threshold: f64,
    max_units: usize,
) -> Option<String> {
    let query_terms = significant_terms(query.content());

    let mut candidates: Vec<Candidate> = ranked_sources(responses, priority)
        .into_iter()
        .enumerate()
        .flat_map(|(source_rank, index)| {
            segment(&responses[index].text)
                .into_iter()
                .filter(TextUnit::has_terms)
                .map(move |unit| (source_rank, unit))
        })
        .map(|(source_rank, unit)| Candidate {
            score: relevance(&unit, &query_terms),
            unit,
            source_rank,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.source_rank.cmp(&b.source_rank))
            .then(a.unit.position.cmp(&b.unit.position))
    });

    let mut accepted: Vec<(usize, TextUnit)> = Vec::new();
    for candidate in candidates {
        if accepted.len() >= max_units {
            break;
        }
        let redundant = accepted
            .iter()
            .any(|(_, kept)| jaccard(&kept.terms, &candidate.unit.terms) > redundancy_threshold);
        if redundant {
            continue;
        }
        debug!(
            score = candidate.score,
            source_rank = candidate.source_rank,
            "best_parts accepted unit"
        );
        accepted.push((candidate.source_rank, candidate.unit));
    }

    if accepted.is_empty() {
        return None;
    }

    // Slots follow score order; each source fills its own slots in original position order.
    let mut per_source: BTreeMap<usize, VecDeque<&TextUnit>> = BTreeMap::new();
    for (source_rank, unit) in &accepted {
        per_source.entry(*source_rank).or_default().push_back(unit);
    }
    for queue in per_source.values_mut() {
        queue.make_contiguous().sort_by_key(|unit| unit.position);
    }

    let ordered: Vec<&TextUnit> = accepted
        .iter()
        .filter_map(|(source_rank, _)| per_source.get_mut(source_rank)?.pop_front())
        .collect();

    Some(render(ordered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(items: &[(&str, &str)]) -> Vec<ModelAnswer> {
        items.iter().map(|(b, t)| ModelAnswer::new(*b, *t)).collect()
    }

    #[test]
    fn test_relevant_units_first() {
        let responses = answers(&[
            ("a", "Rust ownership prevents data races. Bananas are yellow."),
            ("b", "Rust borrow checker enforces ownership rules at compile time."),
        ]);
        let query = Query::new("How does Rust ownership work?").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.6, 12).unwrap();

        assert!(out.starts_with("Rust ownership prevents data races."));
        assert!(out.contains("borrow checker"));
        assert!(out.ends_with("Bananas are yellow."));
    }

    #[test]
    fn test_redundant_units_dropped() {
        let responses = answers(&[
            ("a", "Rust ownership prevents data races."),
            ("b", "Rust ownership prevents data races!"),
        ]);
        let query = Query::new("rust ownership").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.6, 12).unwrap();
        assert_eq!(out, "Rust ownership prevents data races.");
    }

    #[test]
    fn test_priority_breaks_ties() {
        let responses = answers(&[
            ("a", "Ownership moves values."),
            ("b", "Ownership frees memory."),
        ]);
        let query = Query::new("ownership").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::new(["b"]), 0.6, 12).unwrap();
        assert_eq!(out, "Ownership frees memory. Ownership moves values.");
    }

    #[test]
    fn test_same_source_keeps_order() {
        let responses = answers(&[
            ("a", "Slicing reverses strings. Slicing copies strings."),
            ("b", "Unrelated filler text here."),
        ]);
        let query = Query::new("slicing strings").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.9, 12).unwrap();
        assert!(out.starts_with("Slicing reverses strings. Slicing copies strings."));
    }

    #[test]
    fn test_higher_scoring_later_unit_stays_after_earlier_one() {
        let responses = answers(&[
            (
                "a",
                "Bananas grow in rust colored soil. Rust ownership prevents data races.",
            ),
            ("b", "Completely unrelated filler."),
        ]);
        let query = Query::new("rust ownership data races").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.6, 12).unwrap();

        assert!(out.starts_with(
            "Bananas grow in rust colored soil. Rust ownership prevents data races."
        ));
        assert!(out.ends_with("Completely unrelated filler."));
    }

    #[test]
    fn test_max_units_caps_output() {
        let responses = answers(&[
            ("a", "Alpha one. Beta two. Gamma three."),
            ("b", "Delta four. Epsilon five."),
        ]);
        let query = Query::new("greek letters").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.6, 2).unwrap();
        assert_eq!(out, "Alpha one. Beta two.");
    }

    #[test]
    fn test_code_block_kept_whole() {
        let responses = answers(&[
            (
                "a",
                "Use slicing in python.\n\n```python\ndef reverse(s):\n    return s[::-1]\n```",
            ),
            ("b", "Python strings can be reversed with slicing."),
        ]);
        let query = Query::new("reverse a string in python").unwrap();
        let out = fuse(&responses, &query, &PriorityOrder::default(), 0.6, 12).unwrap();
        assert!(out.contains("```python\ndef reverse(s):\n    return s[::-1]\n```"));
    }

    #[test]
    fn test_nothing_to_accept() {
        let responses = answers(&[("a", "..."), ("b", "!!")]);
        let query = Query::new("anything").unwrap();
        assert!(fuse(&responses, &query, &PriorityOrder::default(), 0.6, 12).is_none());
    }
}
