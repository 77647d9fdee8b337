//! # Selene Core
//!
//! Domain types, traits, and error definitions for the Selene context
//! assembly and retrieval engine. This crate has **no engine logic**: it
//! defines the vocabulary that the memory, context and CLI crates share.
//!
//! ## Design Philosophy
//!
//! Every pluggable seam is a trait here:
//! - [`TokenEstimator`]: swap the 4-chars-per-token heuristic for a real tokenizer
//! - [`Embedder`]: the external embedding capability (no implementation ships)
//!
//! Everything else is plain data: chunks, notes, threads, messages and
//! labelled context blocks.

pub mod chunk;
pub mod context_block;
pub mod embedding;
pub mod entity;
pub mod error;
pub mod message;
pub mod token;
pub mod use_case;

// Re-export key types at crate root for ergonomics
pub use chunk::{Chunk, EmbeddedChunk, ScoredChunk};
pub use context_block::{ContextBlock, ContextBlockType, RetrievedContext};
pub use embedding::Embedder;
pub use entity::{FidelityTier, Note, Thread, ThreadStatus};
pub use error::{Error, IndexError, Result};
pub use message::{Message, Role};
pub use token::{CharRatioEstimator, TokenEstimator, char_len, estimate_tokens};
pub use use_case::UseCase;
