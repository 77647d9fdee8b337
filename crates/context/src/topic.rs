//! Topic labels for chunks.

use std::collections::HashMap;

/// Infers a short topic label for a chunk of text.
pub trait TopicLabeler: Send + Sync {
    fn label(&self, text: &str) -> Option<String>;
}

const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "because", "been", "before", "being", "could", "does",
    "doing", "down", "each", "even", "every", "from", "have", "having", "here", "into", "just",
    "like", "more", "most", "much", "only", "other", "over", "really", "same", "should", "some",
    "such", "than", "that", "their", "them", "then", "there", "these", "they", "thing", "things",
    "this", "those", "through", "very", "want", "were", "what", "when", "where", "which",
    "while", "will", "with", "would", "your",
];

/// Heading text when the chunk opens with a Markdown heading, otherwise the
/// most frequent content words.
#[derive(Debug, Clone, Copy)]
pub struct HeadingKeywordLabeler {
    max_keywords: usize,
    min_word_chars: usize,
}

impl HeadingKeywordLabeler {
    pub fn new(max_keywords: usize) -> Self {
        Self {
            max_keywords,
            min_word_chars: 4,
        }
    }

    fn heading(text: &str) -> Option<String> {
        let first_line = text.lines().next()?.trim_start();
        let hashes = first_line.chars().take_while(|c| *c == '#').count();
        if hashes == 0 || hashes > 6 {
            return None;
        }
        let rest = &first_line[hashes..];
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim().trim_end_matches('#').trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn keywords(&self, text: &str) -> Option<String> {
        // word -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let words = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .map(|w| w.trim_matches('\'').to_lowercase())
            .filter(|w| w.chars().count() >= self.min_word_chars)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| !STOPWORDS.contains(&w.as_str()));

        for (position, word) in words.enumerate() {
            counts.entry(word).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
        let top: Vec<String> = ranked
            .into_iter()
            .take(self.max_keywords)
            .map(|(word, _)| word)
            .collect();

        (!top.is_empty()).then(|| top.join(", "))
    }
}

impl Default for HeadingKeywordLabeler {
    fn default() -> Self {
        Self::new(3)
    }
}

impl TopicLabeler for HeadingKeywordLabeler {
    fn label(&self, text: &str) -> Option<String> {
        Self::heading(text).or_else(|| self.keywords(text))
    }
}
