//! Document chunker.
//!
//! Splits document text into retrievable [`Chunk`]s of roughly
//! `min_tokens..=max_tokens` estimated tokens:
//!
//! 1. Cut at paragraph and heading boundaries, trim, drop empties.
//! 2. Re-split any segment over `max_tokens` at sentence ends, filling each
//!    piece until the next sentence would push it past `max_tokens`; a
//!    single over-long sentence is cut at the last whitespace before the
//!    limit.
//! 3. Greedily merge adjacent pieces (joined by a blank line) while the
//!    combined estimate stays within `max_tokens`.
//!
//! No chunk ever exceeds `max_tokens`. The final chunk may fall below
//! `min_tokens`. Chunking is pure and deterministic.

use crate::boundary::{BoundaryDetector, RegexBoundaryDetector, split_segments};
use crate::topic::{HeadingKeywordLabeler, TopicLabeler};
use selene_config::ChunkingConfig;
use selene_core::{CharRatioEstimator, Chunk, TokenEstimator};
use selene_memory::content_version;
use std::sync::Arc;
use uuid::Uuid;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];
const MERGE_SEPARATOR: &str = "\n\n";

pub struct Chunker {
    min_tokens: usize,
    max_tokens: usize,
    estimator: Arc<dyn TokenEstimator>,
    detector: Box<dyn BoundaryDetector>,
    labeler: Box<dyn TopicLabeler>,
}

impl Chunker {
    /// Chunker with the regex boundary detector, heading/keyword topics and
    /// the 4-chars-per-token estimate.
    pub fn new(min_tokens: usize, max_tokens: usize) -> Self {
        let max_tokens = max_tokens.max(1);
        Self {
            min_tokens: min_tokens.min(max_tokens),
            max_tokens,
            estimator: Arc::new(CharRatioEstimator::default()),
            detector: Box::new(RegexBoundaryDetector),
            labeler: Box::new(HeadingKeywordLabeler::default()),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.min_tokens, config.max_tokens)
            .with_estimator(Arc::new(CharRatioEstimator::new(config.chars_per_token)))
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_detector(mut self, detector: impl BoundaryDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_labeler(mut self, labeler: impl TopicLabeler + 'static) -> Self {
        self.labeler = Box::new(labeler);
        self
    }

    pub fn min_tokens(&self) -> usize {
        self.min_tokens
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Split a document into chunks with deterministic ids and topics.
    pub fn split(&self, document_id: &str, text: &str) -> Vec<Chunk> {
        let version = content_version(text);
        let pieces = self.split_text(text);
        let last = pieces.len().saturating_sub(1);

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let estimated_tokens = self.estimator.estimate(&piece);
                if index < last && estimated_tokens < self.min_tokens {
                    tracing::debug!(
                        document_id,
                        index,
                        estimated_tokens,
                        min_tokens = self.min_tokens,
                        "Undersized chunk kept, neighbours leave no room to merge"
                    );
                }
                Chunk {
                    id: chunk_id(document_id, &version, index),
                    document_id: document_id.to_string(),
                    index,
                    topic: self.labeler.label(&piece),
                    estimated_tokens,
                    text: piece,
                }
            })
            .collect();

        tracing::debug!(document_id, chunks = chunks.len(), "Chunked document");
        chunks
    }

    /// The chunk texts alone, in document order.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        for segment in split_segments(text, self.detector.as_ref()) {
            if self.estimator.estimate(segment) > self.max_tokens {
                pieces.extend(self.split_oversized(segment));
            } else {
                pieces.push(segment.to_string());
            }
        }

        self.merge(pieces)
    }

    // ── Oversized segments ───────────────────────────────────────────────

    /// Sentence-level re-split. Sentences accumulate into a piece until the
    /// next one would exceed `max_tokens`.
    fn split_oversized(&self, segment: &str) -> Vec<String> {
        let mut units = Vec::new();
        for sentence in sentences(segment) {
            if self.estimator.estimate(sentence) > self.max_tokens {
                units.extend(self.hard_split(sentence));
            } else {
                units.push(sentence.to_string());
            }
        }

        let mut pieces = Vec::new();
        let mut current = String::new();
        for unit in units {
            if !current.is_empty() {
                let candidate = format!("{current} {unit}");
                if self.estimator.estimate(&candidate) > self.max_tokens {
                    pieces.push(std::mem::take(&mut current));
                    current = unit;
                } else {
                    current = candidate;
                }
            } else {
                current = unit;
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }

    /// Cut text with no usable sentence break at the last whitespace before
    /// the character limit, or at the limit itself.
    fn hard_split(&self, sentence: &str) -> Vec<String> {
        let limit = self.estimator.chars_for_tokens(self.max_tokens).max(1);
        let mut pieces = Vec::new();
        let mut rest = sentence.trim();

        while !rest.is_empty() {
            let Some((cut, _)) = rest.char_indices().nth(limit) else {
                pieces.push(rest.to_string());
                break;
            };
            // `cut` is the byte offset of the first char past the limit.
            let head = &rest[..cut];
            let split_at = match head.rfind(char::is_whitespace) {
                Some(ws) if ws > 0 => ws,
                _ => cut,
            };
            let piece = rest[..split_at].trim();
            if !piece.is_empty() {
                pieces.push(piece.to_string());
            }
            rest = rest[split_at..].trim_start();
        }
        pieces
    }

    // ── Merging ──────────────────────────────────────────────────────────

    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut merged = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let combined = format!("{current}{MERGE_SEPARATOR}{piece}");
            if self.estimator.estimate(&combined) <= self.max_tokens {
                current = combined;
            } else {
                merged.push(std::mem::replace(&mut current, piece));
            }
        }

        if !current.trim().is_empty() {
            merged.push(current);
        }
        merged
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Deterministic chunk id from document id, content version and position.
pub fn chunk_id(document_id: &str, version: &str, index: usize) -> String {
    let name = format!("{document_id}:{version}:{index}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// Sentences of `text`, each keeping its own terminator run (`.`, `?!`,
/// `...`). Trailing text without a terminator is the last sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !SENTENCE_TERMINATORS.contains(&next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = end;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}
