//! Retrieval storage for Selene: cosine ranking over embedded chunks and
//! the versioned, in-memory chunk index.

pub mod chunk_index;
pub mod vector;

pub use chunk_index::{ChunkIndex, ChunkSnapshot, content_version};
pub use vector::{RetrievalParams, cosine_similarity, retrieve, retrieve_top};
