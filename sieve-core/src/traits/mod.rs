//! Collaborator and channel contracts. All async and object-safe.

mod channel;
mod embedding;
mod graph;
mod intent_model;
mod vector_store;

pub use channel::ChannelExecutor;
pub use embedding::EmbeddingProvider;
pub use graph::GraphStore;
pub use intent_model::IntentModel;
pub use vector_store::DualVectorStore;
