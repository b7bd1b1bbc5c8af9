//! Text units and lexical overlap
//!
//! Responses are cut into units: fenced code blocks stay whole, list items
//! are one unit each, and remaining prose is split into sentences. Each unit
//! carries its set of significant terms (lowercase, alphanumeric, length ≥ 2,
//! not a stopword), which is what every strategy compares.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Sentence,
    ListItem,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    pub text: String,
    pub kind: UnitKind,
    pub terms: BTreeSet<String>,
    /// Index of this unit within its source response
    pub position: usize,
}

impl TextUnit {
    fn new(text: String, kind: UnitKind, position: usize) -> Self {
        let terms = significant_terms(&text);
        Self {
            text,
            kind,
            terms,
            position,
        }
    }

    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }
}

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercase significant terms of a text
pub fn significant_terms(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 2)
        .map(|w| w.to_lowercase())
        .filter(|w| !is_stopword(w))
        .collect()
}

/// Jaccard overlap of two term sets, 0.0 when both are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

pub fn similarity(a: &TextUnit, b: &TextUnit) -> f64 {
    jaccard(&a.terms, &b.terms)
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        return true;
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && (trimmed[digits..].starts_with(". ") || trimmed[digits..].starts_with(") "))
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Split prose into sentences at `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let collapsed = crate::core::string::collapse_whitespace(s);
    if !collapsed.is_empty() {
        out.push(collapsed);
    }
}

/// Segment a response into units, in source order
pub fn segment(text: &str) -> Vec<TextUnit> {
    let mut units: Vec<TextUnit> = Vec::new();
    let mut paragraph = String::new();
    let mut code: Option<Vec<&str>> = None;

    let flush_paragraph = |paragraph: &mut String, units: &mut Vec<TextUnit>| {
        for sentence in split_sentences(paragraph) {
            let position = units.len();
            units.push(TextUnit::new(sentence, UnitKind::Sentence, position));
        }
        paragraph.clear();
    };

    for line in text.lines() {
        if let Some(block) = code.as_mut() {
            block.push(line);
            if is_fence(line) {
                let position = units.len();
                units.push(TextUnit::new(block.join("\n"), UnitKind::CodeBlock, position));
                code = None;
            }
            continue;
        }

        if is_fence(line) {
            flush_paragraph(&mut paragraph, &mut units);
            code = Some(vec![line]);
        } else if line.trim().is_empty() || is_heading(line) {
            flush_paragraph(&mut paragraph, &mut units);
            if is_heading(line) {
                let position = units.len();
                units.push(TextUnit::new(
                    line.trim().to_string(),
                    UnitKind::ListItem,
                    position,
                ));
            }
        } else if is_list_item(line) {
            flush_paragraph(&mut paragraph, &mut units);
            let position = units.len();
            units.push(TextUnit::new(
                crate::core::string::collapse_whitespace(line),
                UnitKind::ListItem,
                position,
            ));
        } else {
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(line);
        }
    }

    // Unterminated fence: keep what we have as a block
    if let Some(block) = code {
        let position = units.len();
        units.push(TextUnit::new(block.join("\n"), UnitKind::CodeBlock, position));
    }
    flush_paragraph(&mut paragraph, &mut units);

    units
}

/// Render units back into text
///
/// Consecutive sentences share a paragraph, consecutive list items share a
/// block, code blocks always stand alone.
pub fn render<'a>(units: impl IntoIterator<Item = &'a TextUnit>) -> String {
    let mut out = String::new();
    let mut previous: Option<UnitKind> = None;

    for unit in units {
        if let Some(prev) = previous {
            let separator = match (prev, unit.kind) {
                (UnitKind::Sentence, UnitKind::Sentence) => " ",
                (UnitKind::ListItem, UnitKind::ListItem) => "\n",
                _ => "\n\n",
            };
            out.push_str(separator);
        }
        out.push_str(&unit.text);
        previous = Some(unit.kind);
    }

    out
}
