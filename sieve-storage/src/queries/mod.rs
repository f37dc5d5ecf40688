pub mod chunk_ops;
pub mod codec;
pub mod graph_ops;
pub mod vector_search;
