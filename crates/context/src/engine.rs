//! The context engine facade.
//!
//! Wires the chunker, chunk index, ranker, renderer, assembler and history
//! compressor together from one [`EngineConfig`]. Each use-case selects its
//! own token ceiling.

use crate::assembler::{AssemblyStats, ContextBuilder};
use crate::chunker::Chunker;
use crate::history::HistoryCompressor;
use crate::render::{Entity, Render};
use crate::retrieval::ContextualRetriever;
use selene_config::EngineConfig;
use selene_core::{
    Chunk, EmbeddedChunk, Embedder, Error, Message, Note, Result, ScoredChunk, Thread, UseCase,
};
use selene_memory::{ChunkIndex, ChunkSnapshot, RetrievalParams, content_version, retrieve};
use serde::Serialize;
use std::sync::Arc;

/// The output of one assembly request.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledContext {
    pub use_case: UseCase,
    pub text: String,
    pub stats: AssemblyStats,
}

pub struct ContextEngine {
    config: EngineConfig,
    chunker: Chunker,
    index: ChunkIndex,
    history: HistoryCompressor,
}

impl ContextEngine {
    /// `chunking.chars_per_token` only affects chunk sizing. Assembly and
    /// history budgets always convert at 4 chars per token.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            chunker: Chunker::from_config(&config.chunking),
            index: ChunkIndex::new(),
            history: HistoryCompressor::new(&config.history),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    /// Token ceiling for a use-case.
    pub fn budget_for(&self, use_case: UseCase) -> usize {
        self.config.budgets.for_use_case(use_case)
    }

    /// An empty builder sized to the use-case budget.
    pub fn builder(&self, use_case: UseCase) -> ContextBuilder {
        ContextBuilder::new(self.budget_for(use_case))
    }

    // ── Documents ────────────────────────────────────────────────────────

    pub fn chunk(&self, document_id: &str, text: &str) -> Vec<Chunk> {
        self.chunker.split(document_id, text)
    }

    /// Chunk, embed and index a document. Unchanged content keeps the
    /// existing snapshot without re-chunking or re-embedding. Every vector
    /// must have the embedder's declared dimensionality.
    pub fn index_document(
        &self,
        document_id: &str,
        text: &str,
        embedder: &dyn Embedder,
    ) -> Result<Arc<ChunkSnapshot>> {
        let version = content_version(text);
        if let Some(existing) = self.index.snapshot(document_id)? {
            if existing.version == version {
                tracing::debug!(document_id, "Document unchanged, keeping indexed chunks");
                return Ok(existing);
            }
        }

        let chunks = self.chunk(document_id, text);
        let embeddings = if chunks.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            embedder.embed(&texts)?
        };

        let snapshot = Arc::new(ChunkSnapshot::new(document_id, version, chunks, embeddings)?);
        let dims = embedder.dims();
        if let Some(bad) = snapshot.embeddings.iter().find(|e| e.len() != dims) {
            return Err(Error::Embedding(format!(
                "{} returned a {}-dimensional vector for {document_id}, expected {dims}",
                embedder.model_name(),
                bad.len()
            )));
        }
        tracing::info!(
            document_id,
            chunks = snapshot.chunks.len(),
            tokens = snapshot.token_count(),
            model = embedder.model_name(),
            "Indexed document"
        );
        self.index.replace(Arc::clone(&snapshot))?;
        Ok(snapshot)
    }

    pub fn remove_document(&self, document_id: &str) -> Result<bool> {
        Ok(self.index.remove(document_id)?)
    }

    // ── Retrieval ────────────────────────────────────────────────────────

    pub fn retrieval_params(&self) -> RetrievalParams {
        RetrievalParams::from(&self.config.retrieval)
    }

    /// Rank every indexed chunk against `query`.
    pub fn retrieve(&self, query: &[f32]) -> Result<Vec<ScoredChunk>> {
        let candidates = self.index.candidates()?;
        Ok(self.retrieve_from(query, &candidates))
    }

    /// Rank caller-supplied candidates against `query`.
    pub fn retrieve_from(&self, query: &[f32], candidates: &[EmbeddedChunk]) -> Vec<ScoredChunk> {
        retrieve(query, candidates, &self.retrieval_params())
    }

    // ── Assembly ─────────────────────────────────────────────────────────

    /// Assemble entities in order, each at its assigned tier.
    pub fn assemble(&self, use_case: UseCase, items: &[Entity]) -> AssembledContext {
        let mut builder = self.builder(use_case);
        for item in items {
            builder.add_entity(item, item.assigned_tier());
        }
        self.finish(use_case, builder)
    }

    /// Deep-dive context for one thread: the thread header, the primary note
    /// in full, the other notes at their tiers, then retrieved evidence.
    pub fn deep_dive(
        &self,
        thread: &Thread,
        primary: Option<&Note>,
        notes: &[Note],
        evidence: &[ScoredChunk],
    ) -> AssembledContext {
        let mut builder = self.builder(UseCase::DeepDive);
        builder.add_thread(thread);
        if let Some(note) = primary {
            builder.add_full_text(note);
        }
        for note in notes.iter().filter(|n| primary.is_none_or(|p| p.id != n.id)) {
            builder.add_note(note);
        }
        for scored in evidence {
            builder.add_chunk(&scored.chunk);
        }
        self.finish(UseCase::DeepDive, builder)
    }

    fn finish(&self, use_case: UseCase, builder: ContextBuilder) -> AssembledContext {
        let stats = builder.stats();
        tracing::debug!(
            use_case = use_case.description(),
            included = stats.blocks_included,
            dropped = stats.blocks_dropped,
            used_chars = stats.used_chars,
            "Assembled context"
        );
        AssembledContext {
            use_case,
            text: builder.build(),
            stats,
        }
    }

    // ── Conversation ─────────────────────────────────────────────────────

    pub fn compress_history(&self, messages: &[Message]) -> String {
        self.history.compress(messages)
    }

    pub fn history(&self) -> &HistoryCompressor {
        &self.history
    }

    /// A contextual retriever sized to the chat budget.
    pub fn contextual_retriever(&self) -> ContextualRetriever {
        ContextualRetriever::new(self.budget_for(UseCase::Chat))
    }
}

impl Default for ContextEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
