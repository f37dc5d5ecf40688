//! Query term extraction for entity matching.
//!
//! Unigrams minus stop-words, plus contiguous 2- and 3-word phrases so that
//! multi-word entity names ("operating margin") can match exactly.

use std::collections::HashSet;

use sieve_core::constants::MAX_ENTITY_PHRASE_WORDS;
use sieve_embeddings::tokenize::tokenize;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with", "or", "but", "not", "this",
    "these", "they", "them", "their", "there", "then", "than", "so", "if", "when", "where", "why",
    "how", "what", "which", "who", "whom", "whose", "can", "could", "should", "would", "may",
    "might", "must", "shall", "do", "does", "did", "have", "had", "having", "me", "about", "tell",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercase terms and phrases in first-seen order, without duplicates.
pub fn extract_terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for token in &tokens {
        if !is_stop_word(token) && seen.insert(token.clone()) {
            terms.push(token.clone());
        }
    }

    for width in 2..=MAX_ENTITY_PHRASE_WORDS {
        for window in tokens.windows(width) {
            let (first, last) = (&window[0], &window[width - 1]);
            if is_stop_word(first) || is_stop_word(last) {
                continue;
            }
            let phrase = window.join(" ");
            if seen.insert(phrase.clone()) {
                terms.push(phrase);
            }
        }
    }
    terms
}
