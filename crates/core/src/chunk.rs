//! Chunk domain types.
//!
//! A [`Chunk`] is a bounded-size retrievable unit of document text. Chunks
//! are produced once per document version and never mutated afterwards;
//! a content change replaces the whole set.

use serde::{Deserialize, Serialize};

/// Maximum preview length, in characters, before an ellipsis is appended.
const PREVIEW_CHARS: usize = 100;

/// A contiguous slice of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic id (document id + version + index)
    pub id: String,

    /// The document this chunk was cut from
    pub document_id: String,

    /// Position within the document, starting at 0
    pub index: usize,

    /// The chunk text
    pub text: String,

    /// Inferred topic label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Token estimate of `text`
    pub estimated_tokens: usize,
}

impl Chunk {
    /// Short display form: the first 100 characters plus `...` when longer.
    pub fn preview(&self) -> String {
        if self.text.chars().count() <= PREVIEW_CHARS {
            return self.text.clone();
        }
        let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

/// A chunk paired with its embedding vector, i.e. a ranking candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

impl EmbeddedChunk {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}

/// A chunk scored against a query. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,

    /// Cosine similarity to the query vector
    pub similarity: f32,
}
