//! Weighted reciprocal rank fusion.

pub mod rrf_fusion;

pub use rrf_fusion::{compare, fuse};
