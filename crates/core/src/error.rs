//! Error types for the Selene domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The pure pipeline stages never fail; errors only arise at the edges
//! (configuration, the chunk index, caller-supplied input).

use thiserror::Error;

/// The top-level error type for all Selene operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Chunk index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Embedding errors ---
    #[error("Embedding failed: {0}")]
    Embedding(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Document id must not be empty")]
    EmptyDocumentId,

    #[error("Embedding count mismatch for {document_id}: {chunks} chunks, {embeddings} vectors")]
    EmbeddingCountMismatch {
        document_id: String,
        chunks: usize,
        embeddings: usize,
    },

    #[error("Chunk index lock poisoned")]
    Poisoned,
}
