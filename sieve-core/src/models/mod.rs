mod channel;
mod chunk;
mod degradation_event;
mod embedding;
mod fusion;
mod graph;
mod query;

pub use channel::{ChannelKind, ChannelRequest, ChannelResult, ChannelStatus, RankedDoc};
pub use chunk::{ChunkPayload, ConsistencyReport, IndexedChunk, ScoredChunk};
pub use degradation_event::DegradationEvent;
pub use embedding::{Embedding, SparseVector};
pub use fusion::{Diagnostics, FusionCandidate, FusionResult, RetrievalOutcome};
pub use graph::{Entity, GlobalExpansion, Mention};
pub use query::{Query, QueryFilters};
