//! Budgeted context assembly.
//!
//! A [`ContextBuilder`] collects rendered blocks under a hard character
//! ceiling of `budget_tokens × chars_per_token`. Blocks are joined with a
//! blank line; each separator costs two characters. A block that does not
//! fit is dropped whole: no truncation and no retry.
//!
//! # Determinism
//!
//! Assembly is deterministic: identical block sequences always produce
//! identical output, in insertion order.

use crate::render::{Entity, Render, render_chunk, render_full};
use selene_core::{CharRatioEstimator, Chunk, FidelityTier, Note, Thread, TokenEstimator, char_len};
use serde::{Deserialize, Serialize};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Inclusion counts for a finished or in-progress assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Configured budget in tokens
    pub budget_tokens: usize,
    /// Characters consumed, separators included
    pub used_chars: usize,
    pub blocks_included: usize,
    pub blocks_dropped: usize,
    /// Characters of content that did not fit
    pub chars_dropped: usize,
}

impl AssemblyStats {
    /// Share of the character budget in use (0.0–100.0).
    pub fn utilization_pct(&self, budget_chars: usize) -> f32 {
        if budget_chars == 0 {
            return 0.0;
        }
        (self.used_chars as f32 / budget_chars as f32) * 100.0
    }
}

/// Accumulates context blocks within a fixed token budget.
pub struct ContextBuilder {
    budget_tokens: usize,
    budget_chars: usize,
    used_chars: usize,
    blocks: Vec<String>,
    dropped: usize,
    chars_dropped: usize,
    estimator: CharRatioEstimator,
}

impl ContextBuilder {
    /// Builder with the standard 4-characters-per-token ratio.
    pub fn new(budget_tokens: usize) -> Self {
        Self::with_estimator(budget_tokens, CharRatioEstimator::default())
    }

    pub fn with_estimator(budget_tokens: usize, estimator: CharRatioEstimator) -> Self {
        Self {
            budget_tokens,
            budget_chars: estimator.chars_for_tokens(budget_tokens),
            used_chars: 0,
            blocks: Vec::new(),
            dropped: 0,
            chars_dropped: 0,
            estimator,
        }
    }

    /// Append `block` if it fits. Returns whether it was included.
    pub fn add(&mut self, block: impl Into<String>) -> bool {
        let block = block.into();
        let separator = if self.blocks.is_empty() {
            0
        } else {
            BLOCK_SEPARATOR.len()
        };
        let cost = char_len(&block).saturating_add(separator);

        if self.used_chars.saturating_add(cost) > self.budget_chars {
            self.dropped += 1;
            self.chars_dropped += char_len(&block);
            tracing::debug!(
                block_chars = char_len(&block),
                used_chars = self.used_chars,
                budget_chars = self.budget_chars,
                "Dropped context block over budget"
            );
            return false;
        }

        self.used_chars += cost;
        self.blocks.push(block);
        true
    }

    /// Add a note at its assigned fidelity tier.
    pub fn add_note(&mut self, note: &Note) -> bool {
        self.add(note.render(note.fidelity_tier))
    }

    /// Add a note at full fidelity regardless of its assigned tier.
    pub fn add_full_text(&mut self, note: &Note) -> bool {
        self.add(render_full(note))
    }

    pub fn add_thread(&mut self, thread: &Thread) -> bool {
        self.add(thread.render(FidelityTier::Full))
    }

    pub fn add_entity(&mut self, entity: &Entity, tier: FidelityTier) -> bool {
        self.add(entity.render(tier))
    }

    pub fn add_chunk(&mut self, chunk: &Chunk) -> bool {
        self.add(render_chunk(chunk))
    }

    /// Tokens still available, rounded down.
    pub fn remaining_tokens(&self) -> usize {
        self.estimator
            .tokens_for_chars(self.budget_chars.saturating_sub(self.used_chars))
    }

    pub fn used_chars(&self) -> usize {
        self.used_chars
    }

    pub fn budget_chars(&self) -> usize {
        self.budget_chars
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn stats(&self) -> AssemblyStats {
        AssemblyStats {
            budget_tokens: self.budget_tokens,
            used_chars: self.used_chars,
            blocks_included: self.blocks.len(),
            blocks_dropped: self.dropped,
            chars_dropped: self.chars_dropped,
        }
    }

    /// Join the included blocks in insertion order.
    pub fn build(&self) -> String {
        self.blocks.join(BLOCK_SEPARATOR)
    }
}
