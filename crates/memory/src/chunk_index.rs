//! Versioned in-memory chunk index.
//!
//! Each document maps to one immutable [`ChunkSnapshot`] behind an `Arc`.
//! Replacing a document swaps the whole snapshot under a single write lock,
//! so readers see either the old chunk set or the new one, never a mix.

use selene_core::{Chunk, EmbeddedChunk, IndexError};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Content version of a document: hex SHA-256 of its text.
pub fn content_version(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// All chunks and vectors of one document version.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSnapshot {
    pub document_id: String,
    pub version: String,
    pub chunks: Vec<Chunk>,
    /// One vector per chunk, same order as `chunks`
    pub embeddings: Vec<Vec<f32>>,
}

impl ChunkSnapshot {
    /// Build a snapshot, checking that every chunk has exactly one vector.
    pub fn new(
        document_id: impl Into<String>,
        version: impl Into<String>,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, IndexError> {
        let document_id = document_id.into();
        if document_id.trim().is_empty() {
            return Err(IndexError::EmptyDocumentId);
        }
        if chunks.len() != embeddings.len() {
            return Err(IndexError::EmbeddingCountMismatch {
                document_id,
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }
        Ok(Self {
            document_id,
            version: version.into(),
            chunks,
            embeddings,
        })
    }

    /// Chunks paired with their vectors, in chunk order.
    pub fn embedded(&self) -> impl Iterator<Item = EmbeddedChunk> + '_ {
        self.chunks
            .iter()
            .zip(self.embeddings.iter())
            .map(|(chunk, embedding)| EmbeddedChunk::new(chunk.clone(), embedding.clone()))
    }

    pub fn token_count(&self) -> usize {
        self.chunks.iter().map(|c| c.estimated_tokens).sum()
    }
}

/// Thread-safe map from document id to its current snapshot.
#[derive(Debug, Default)]
pub struct ChunkIndex {
    documents: RwLock<BTreeMap<String, Arc<ChunkSnapshot>>>,
}

impl ChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a snapshot, returning the one it replaced.
    pub fn replace(
        &self,
        snapshot: impl Into<Arc<ChunkSnapshot>>,
    ) -> Result<Option<Arc<ChunkSnapshot>>, IndexError> {
        let snapshot = snapshot.into();
        let mut documents = self.documents.write().map_err(|_| IndexError::Poisoned)?;
        let document_id = snapshot.document_id.clone();
        let chunk_count = snapshot.chunks.len();
        let previous = documents.insert(document_id.clone(), snapshot);
        tracing::debug!(
            document_id = %document_id,
            chunks = chunk_count,
            replaced = previous.is_some(),
            "Replaced document chunks"
        );
        Ok(previous)
    }

    pub fn snapshot(&self, document_id: &str) -> Result<Option<Arc<ChunkSnapshot>>, IndexError> {
        let documents = self.documents.read().map_err(|_| IndexError::Poisoned)?;
        Ok(documents.get(document_id).cloned())
    }

    /// Whether the stored snapshot for `document_id` has this version.
    pub fn is_current(&self, document_id: &str, version: &str) -> Result<bool, IndexError> {
        Ok(self
            .snapshot(document_id)?
            .is_some_and(|s| s.version == version))
    }

    pub fn remove(&self, document_id: &str) -> Result<bool, IndexError> {
        let mut documents = self.documents.write().map_err(|_| IndexError::Poisoned)?;
        Ok(documents.remove(document_id).is_some())
    }

    /// Every embedded chunk across all documents, ordered by document id
    /// then chunk index.
    pub fn candidates(&self) -> Result<Vec<EmbeddedChunk>, IndexError> {
        let snapshots: Vec<Arc<ChunkSnapshot>> = {
            let documents = self.documents.read().map_err(|_| IndexError::Poisoned)?;
            documents.values().cloned().collect()
        };
        Ok(snapshots.iter().flat_map(|s| s.embedded()).collect())
    }

    /// Number of indexed documents.
    pub fn len(&self) -> Result<usize, IndexError> {
        let documents = self.documents.read().map_err(|_| IndexError::Poisoned)?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(document_id: &str, index: usize, text: &str) -> Chunk {
        Chunk {
            id: format!("{document_id}-{index}"),
            document_id: document_id.into(),
            index,
            text: text.into(),
            topic: None,
            estimated_tokens: text.len() / 4,
        }
    }

    fn snapshot(document_id: &str, text: &str) -> ChunkSnapshot {
        ChunkSnapshot::new(
            document_id,
            content_version(text),
            vec![chunk(document_id, 0, text)],
            vec![vec![1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn version_is_stable_hex_sha256() {
        let v = content_version("hello");
        assert_eq!(v.len(), 64);
        assert_eq!(v, content_version("hello"));
        assert_ne!(v, content_version("hello!"));
    }

    #[test]
    fn snapshot_rejects_empty_document_id() {
        let err = ChunkSnapshot::new("  ", "v1", vec![], vec![]).unwrap_err();
        assert_eq!(err, IndexError::EmptyDocumentId);
    }

    #[test]
    fn snapshot_rejects_vector_count_mismatch() {
        let err = ChunkSnapshot::new("doc", "v1", vec![chunk("doc", 0, "text")], vec![]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::EmbeddingCountMismatch {
                chunks: 1,
                embeddings: 0,
                ..
            }
        ));
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let index = ChunkIndex::new();
        assert!(index.replace(snapshot("doc", "first")).unwrap().is_none());

        let reader_view = index.snapshot("doc").unwrap().unwrap();
        let previous = index.replace(snapshot("doc", "second")).unwrap().unwrap();

        // A reader holding the old Arc keeps a consistent view.
        assert_eq!(reader_view.chunks[0].text, "first");
        assert_eq!(previous.chunks[0].text, "first");
        assert_eq!(index.snapshot("doc").unwrap().unwrap().chunks[0].text, "second");
        assert_eq!(index.len().unwrap(), 1);
    }

    #[test]
    fn is_current_compares_versions() {
        let index = ChunkIndex::new();
        index.replace(snapshot("doc", "body")).unwrap();
        assert!(index.is_current("doc", &content_version("body")).unwrap());
        assert!(!index.is_current("doc", &content_version("edited body")).unwrap());
        assert!(!index.is_current("other", &content_version("body")).unwrap());
    }

    #[test]
    fn remove_document() {
        let index = ChunkIndex::new();
        index.replace(snapshot("doc", "body")).unwrap();
        assert!(index.remove("doc").unwrap());
        assert!(!index.remove("doc").unwrap());
        assert!(index.is_empty().unwrap());
    }

    #[test]
    fn candidates_are_ordered_by_document_then_index() {
        let index = ChunkIndex::new();
        index
            .replace(
                ChunkSnapshot::new(
                    "b",
                    "v",
                    vec![chunk("b", 0, "b0"), chunk("b", 1, "b1")],
                    vec![vec![1.0], vec![2.0]],
                )
                .unwrap(),
            )
            .unwrap();
        index.replace(snapshot("a", "a0")).unwrap();

        let ids: Vec<String> = index
            .candidates()
            .unwrap()
            .into_iter()
            .map(|c| c.chunk.id)
            .collect();
        assert_eq!(ids, ["a-0", "b-0", "b-1"]);
    }

    #[test]
    fn index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChunkIndex>();
    }
}
