//! Intent classification: optional model with a hard timeout, deterministic
//! heuristic fallback, bounded cache, and the hot-reloadable weight table.

pub mod classifier;
pub mod heuristic;
pub mod weight_table;

pub use classifier::IntentClassifier;
pub use heuristic::HeuristicVerdict;
pub use weight_table::WeightTable;
