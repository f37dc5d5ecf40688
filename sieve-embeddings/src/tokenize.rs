//! Lexical tokenizer shared by the embedder and query-term extraction.

use sieve_core::constants::MIN_TOKEN_LEN;

/// Split on anything that is not alphanumeric or `_`, lowercase, and drop
/// tokens shorter than `MIN_TOKEN_LEN` characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| s.chars().count() >= MIN_TOKEN_LEN)
        .map(|s| s.to_lowercase())
        .collect()
}

/// FNV-1a over the term's bytes.
pub fn hash_term(term: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in term.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("Revenue grew 15% in Q3!"),
            vec!["revenue", "grew", "15", "in", "q3"]
        );
    }

    #[test]
    fn tokenize_drops_single_chars_and_keeps_underscores() {
        assert_eq!(tokenize("a b_c d"), vec!["b_c"]);
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(hash_term("revenue"), hash_term("revenue"));
        assert_ne!(hash_term("revenue"), hash_term("profit"));
    }
}
