//! Embedding capability trait.
//!
//! Embedding generation is an external collaborator. The engine never
//! calls a model itself; callers hand it resolved vectors, or plug an
//! [`Embedder`] into indexing.

use crate::error::Result;

/// An embedding backend with a fixed dimensionality per model.
pub trait Embedder: Send + Sync {
    /// Model identifier (e.g. `"nomic-embed-text"`).
    fn model_name(&self) -> &str;

    /// Vector dimensionality (e.g. `768`).
    fn dims(&self) -> usize;

    /// Embed each text, returning one vector per input in order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}
