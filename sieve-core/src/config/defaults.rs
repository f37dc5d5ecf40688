// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "sieve.db";
pub const DEFAULT_MMAP_SIZE: u64 = 268_435_456; // 256 MB
pub const DEFAULT_CACHE_SIZE: i64 = -64_000; // 64 MB (negative = KB)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_SPARSE_BUCKETS: u32 = 1 << 18;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

// --- Intent ---
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_INTENT_CACHE_SIZE: u64 = 1_000;
pub const DEFAULT_FACTUAL_DEADLINE_MS: u64 = 800;
pub const DEFAULT_KEYWORD_DEADLINE_MS: u64 = 800;
pub const DEFAULT_EXPLORATORY_DEADLINE_MS: u64 = 2_000;
pub const DEFAULT_SUMMARY_DEADLINE_MS: u64 = 2_000;

// --- Channels ---
pub const DEFAULT_CHANNEL_TOP_K: usize = 20;
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_QUEUE_TIMEOUT_MS: u64 = 25;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 50;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_TIMEOUT_FRACTION: f64 = 0.9;
pub const DEFAULT_GLOBAL_TOP_COMMUNITIES: usize = 3;
pub const DEFAULT_SKIP_ZERO_WEIGHT_CHANNELS: bool = false;

// --- Fusion ---
pub const DEFAULT_RRF_K: f64 = 60.0;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_RENORMALIZE_ON_DEGRADATION: bool = false;
pub const DEFAULT_MAX_QUERY_CHARS: usize = 2_048;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1_000;
pub const DEFAULT_SLOW_QUERY_MS: u64 = 1_500;
