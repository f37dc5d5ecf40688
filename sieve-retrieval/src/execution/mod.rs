//! Guarded channel execution: backpressure, soft timeout, retry, cancellation.

pub mod guard;

pub use guard::ChannelGuard;
