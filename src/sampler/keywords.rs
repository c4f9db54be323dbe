//! Keyword extraction and term-frequency scoring.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Tokens this short never count as keywords.
const MIN_KEYWORD_LEN: usize = 4;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("static token pattern is valid"))
}

/// Extract the keyword set of a prompt.
///
/// Tokens are lowercase ASCII alphanumeric runs longer than three characters.
/// Everything else is a separator. Duplicates are dropped and the first
/// occurrence fixes the order, so the result is stable for a given input.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords: Vec<String> = Vec::new();

    for token in token_regex().find_iter(&lowered) {
        let token = token.as_str();
        if token.len() < MIN_KEYWORD_LEN {
            continue;
        }
        if seen.insert(token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

/// Score a snippet against a keyword set.
///
/// `hits / (chars + 1)` where `hits` sums the non-overlapping, case-insensitive
/// occurrences of every keyword. Short snippets with dense repetition win.
pub fn score(snippet: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let lower = snippet.to_lowercase();
    let hits: usize = keywords
        .iter()
        .map(|keyword| lower.matches(keyword.as_str()).count())
        .sum();

    hits as f64 / (snippet.chars().count() + 1) as f64
}
