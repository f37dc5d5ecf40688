//! Rule-based intent classification from surface features of the query:
//! quoted strings and identifiers, cue phrases, leading question words,
//! and length thresholds. Rules are tried in order; first match wins.

use sieve_core::intent::Intent;
use sieve_embeddings::tokenize::tokenize;

/// Phrases that ask for an overview across themes.
const SUMMARY_CUES: &[&str] = &[
    "summarize",
    "summarise",
    "summary",
    "overview",
    "tldr",
    "recap",
    "main themes",
    "key points",
    "big picture",
    "high level",
];

/// Phrases that ask to browse related material.
const EXPLORATORY_CUES: &[&str] = &[
    "explore",
    "tell me about",
    "related to",
    "what else",
    "connections",
    "relationship between",
    "relationships",
    "similar to",
    "compare",
    "brainstorm",
    "landscape",
];

const QUESTION_WORDS: &[&str] = &[
    "what", "who", "whom", "whose", "when", "where", "which", "how", "why", "is", "are", "was",
    "were", "does", "do", "did", "can", "could", "should",
];

pub const QUOTED_OR_CODE_CONFIDENCE: f64 = 0.7;
pub const SUMMARY_CONFIDENCE: f64 = 0.65;
pub const QUESTION_WORD_CONFIDENCE: f64 = 0.6;
pub const EXPLORATORY_CONFIDENCE: f64 = 0.55;
pub const SHORT_QUERY_CONFIDENCE: f64 = 0.5;
pub const LONG_QUERY_CONFIDENCE: f64 = 0.4;

/// Queries with at most this many tokens (and no `?`) are keyword lookups.
const SHORT_QUERY_TOKENS: usize = 3;
/// Queries with more than this many words are treated as exploratory.
const LONG_QUERY_WORDS: usize = 12;

/// Result of the heuristic: intent, fixed per-rule confidence, and the rule name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicVerdict {
    pub intent: Intent,
    pub confidence: f64,
    pub rule: &'static str,
}

impl HeuristicVerdict {
    fn new(intent: Intent, confidence: f64, rule: &'static str) -> Self {
        Self {
            intent,
            confidence,
            rule,
        }
    }
}

/// Classify `text`, or `None` when no rule applies.
pub fn classify(text: &str) -> Option<HeuristicVerdict> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return None;
    }
    // Padded so cue phrases only match on word boundaries.
    let padded = format!(" {} ", tokens.join(" "));

    if has_quotes(text) || text.split_whitespace().any(looks_like_code) {
        return Some(HeuristicVerdict::new(
            Intent::Keyword,
            QUOTED_OR_CODE_CONFIDENCE,
            "quoted_or_code",
        ));
    }
    if contains_cue(&padded, SUMMARY_CUES) {
        return Some(HeuristicVerdict::new(
            Intent::Summary,
            SUMMARY_CONFIDENCE,
            "summary_cue",
        ));
    }
    if contains_cue(&padded, EXPLORATORY_CUES) {
        return Some(HeuristicVerdict::new(
            Intent::Exploratory,
            EXPLORATORY_CONFIDENCE,
            "exploratory_cue",
        ));
    }
    if QUESTION_WORDS.contains(&tokens[0].as_str()) {
        return Some(HeuristicVerdict::new(
            Intent::Factual,
            QUESTION_WORD_CONFIDENCE,
            "question_word",
        ));
    }
    if tokens.len() <= SHORT_QUERY_TOKENS && !text.contains('?') {
        return Some(HeuristicVerdict::new(
            Intent::Keyword,
            SHORT_QUERY_CONFIDENCE,
            "short_query",
        ));
    }
    if text.split_whitespace().count() > LONG_QUERY_WORDS {
        return Some(HeuristicVerdict::new(
            Intent::Exploratory,
            LONG_QUERY_CONFIDENCE,
            "long_query",
        ));
    }
    None
}

fn has_quotes(text: &str) -> bool {
    text.contains('`') || text.matches('"').count() >= 2
}

fn contains_cue(padded: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| padded.contains(&format!(" {cue} ")))
}

/// Identifiers: snake_case, paths, calls, dotted names, camelCase.
fn looks_like_code(word: &str) -> bool {
    let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '_' && c != '(' && c != ')');
    if word.contains("::") || word.contains("()") {
        return true;
    }
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 3 {
        return false;
    }
    let inner = &chars[1..chars.len() - 1];
    if inner.contains(&'_') {
        return true;
    }
    if chars.windows(3).any(|w| w[1] == '.' && w[0].is_alphanumeric() && w[2].is_alphabetic()) {
        return true;
    }
    chars
        .windows(2)
        .any(|w| w[0].is_lowercase() && w[1].is_uppercase())
}
