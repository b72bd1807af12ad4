//! Response extraction: recovers a JSON document from raw model text.
//!
//! Providers sometimes wrap valid JSON in prose or truncate it, so extraction
//! tries an ordered list of attempts and the first one that parses wins:
//! 1. direct parse of the whole trimmed text (any JSON value, arrays included)
//! 2. regex scan for `{ ... }` spans, each cut at its balanced closing brace
//! 3. manual walk from the first `{` to the brace that closes it
//!
//! Brace counting is purely lexical: braces inside string literals are counted too.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// A parsed JSON value recovered from model output. Whether it has the
/// report's shape is decided later, by `FeasibilityReport::from_value`.
pub type StructuredObject = Value;

type Attempt = fn(&str) -> Option<StructuredObject>;

const ATTEMPTS: [(&str, Attempt); 3] = [
    ("direct", parse_whole),
    ("regex_scan", scan_spans),
    ("brace_walk", walk_from_first_brace),
];

/// Returns the first JSON document recoverable from `raw`, or `None`.
pub fn extract_json(raw: &str) -> Option<StructuredObject> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    ATTEMPTS.iter().find_map(|(name, attempt)| {
        let value = attempt(text)?;
        debug!("Recovered JSON via {name} attempt");
        Some(value)
    })
}

fn parse_value(text: &str) -> Option<StructuredObject> {
    serde_json::from_str(text).ok()
}

/// Any valid JSON document, returned exactly as parsed.
pub fn parse_whole(text: &str) -> Option<StructuredObject> {
    parse_value(text.trim())
}

fn object_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"))
}

pub fn scan_spans(text: &str) -> Option<StructuredObject> {
    object_span_regex()
        .find_iter(text)
        .filter_map(|span| balance_braces(span.as_str()))
        .find_map(parse_value)
}

pub fn walk_from_first_brace(text: &str) -> Option<StructuredObject> {
    balance_braces(text).and_then(parse_value)
}

/// Cuts `text` from its first `{` to the `}` that brings nesting back to zero.
/// `None` when there is no `{` or the braces never balance.
pub fn balance_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
