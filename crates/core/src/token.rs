//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token. This is an
//! approximation, not a tokenizer. Budget enforcement only talks to the
//! [`TokenEstimator`] trait, so a real tokenizer can be substituted later.
//!
//! Lengths are counted in `char`s, never bytes, so multi-byte text is
//! measured the same way it is truncated.

/// Default characters-per-token ratio.
pub const CHARS_PER_TOKEN: usize = 4;

/// Length of a string in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds down.
pub fn estimate_tokens(text: &str) -> usize {
    char_len(text) / CHARS_PER_TOKEN
}

/// Converts between text, characters and tokens.
pub trait TokenEstimator: Send + Sync {
    /// Estimated token count of `text`.
    fn estimate(&self, text: &str) -> usize;

    /// Character ceiling equivalent to a token budget.
    fn chars_for_tokens(&self, tokens: usize) -> usize;

    /// Whole tokens that fit in a character count.
    fn tokens_for_chars(&self, chars: usize) -> usize;
}

/// The fixed-ratio estimator used everywhere by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRatioEstimator {
    chars_per_token: usize,
}

impl CharRatioEstimator {
    /// A ratio of zero is clamped to one character per token.
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(CHARS_PER_TOKEN)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        char_len(text) / self.chars_per_token
    }

    fn chars_for_tokens(&self, tokens: usize) -> usize {
        tokens.saturating_mul(self.chars_per_token)
    }

    fn tokens_for_chars(&self, chars: usize) -> usize {
        chars / self.chars_per_token
    }
}
