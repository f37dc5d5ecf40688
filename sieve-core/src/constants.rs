/// Sieve version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of retrieval channels fused per query.
pub const CHANNEL_COUNT: usize = 4;

/// Upper bound on how many candidates a single channel may return.
pub const MAX_CHANNEL_TOP_K: usize = 1_000;

/// Upper bound on how many fused items a caller may request.
pub const MAX_TOP_N: usize = 500;

/// Minimum token length kept by the lexical tokenizer.
pub const MIN_TOKEN_LEN: usize = 2;

/// Longest phrase (in words) generated when matching entity names.
pub const MAX_ENTITY_PHRASE_WORDS: usize = 3;
