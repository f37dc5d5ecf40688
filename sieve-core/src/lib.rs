//! # sieve-core
//!
//! Foundation crate for the Sieve hybrid retrieval engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::CancellationToken;
pub use config::SieveConfig;
pub use errors::{SieveError, SieveResult};
pub use intent::{ChannelWeights, Intent, IntentProfile, ProfileSource};
pub use models::{
    ChannelKind, ChannelRequest, ChannelResult, ChannelStatus, Diagnostics, Embedding,
    FusionCandidate, FusionResult, Query, QueryFilters, SparseVector,
};
