//! # Selene Context
//!
//! The context assembly pipeline: turns raw note text into bounded,
//! ranked, fidelity-tiered blocks that fit a language-model prompt.
//!
//! - [`chunker`]: documents into retrievable chunks
//! - [`render`] and [`fidelity`]: notes and threads at a fidelity tier
//! - [`assembler`]: hard per-use-case token ceilings
//! - [`history`]: conversation-so-far compression
//! - [`retrieval`]: labelled chat-side evidence blocks
//! - [`engine`]: the facade tying them together
//!
//! Every stage is pure and synchronous apart from the chunk index the
//! engine owns.

pub mod assembler;
pub mod boundary;
pub mod chunker;
pub mod engine;
pub mod fidelity;
pub mod history;
pub mod render;
pub mod retrieval;
pub mod topic;

pub use assembler::{AssemblyStats, ContextBuilder};
pub use boundary::{Boundary, BoundaryDetector, BoundaryKind, RegexBoundaryDetector, ScanBoundaryDetector};
pub use chunker::Chunker;
pub use engine::{AssembledContext, ContextEngine};
pub use fidelity::compute_tier;
pub use history::{HistoryCompressor, compress};
pub use render::{Entity, Render, render_chunk, render_chunk_section, render_full};
pub use retrieval::{ContextSignals, ContextualRetriever, SentimentTrend, TaskOutcome, TaskStatus, ThreadSnapshot};
pub use topic::{HeadingKeywordLabeler, TopicLabeler};
