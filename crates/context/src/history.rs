//! Conversation history compression.
//!
//! The most recent turns are kept verbatim. Older messages are cut to a
//! short preview each and included oldest-first until the character budget
//! runs out.

use selene_config::HistoryConfig;
use selene_core::{CharRatioEstimator, Message, Role, TokenEstimator, char_len};

const EARLIER_HEADER: &str = "[Earlier in conversation:]";
const RECENT_HEADER: &str = "[Recent:]";
/// Reserved for the two section headers and their spacing.
const HEADER_OVERHEAD_CHARS: usize = 40;
const LINE_SEPARATOR: &str = "\n\n";
const ELLIPSIS: &str = "...";

pub struct HistoryCompressor {
    recent_turns: usize,
    max_tokens: usize,
    max_chars_per_message: usize,
    assistant_name: String,
    estimator: CharRatioEstimator,
}

impl HistoryCompressor {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            recent_turns: config.recent_turns,
            max_tokens: config.max_tokens,
            max_chars_per_message: config.max_chars_per_message.max(ELLIPSIS.len() + 1),
            assistant_name: config.assistant_name.clone(),
            estimator: CharRatioEstimator::default(),
        }
    }

    fn label(&self, role: Role) -> &str {
        match role {
            Role::User => "User",
            Role::Assistant => &self.assistant_name,
            Role::System => "System",
        }
    }

    fn line(&self, message: &Message) -> String {
        format!("{}: {}", self.label(message.role), message.content)
    }

    /// Every message verbatim, blank-line separated.
    pub fn format_history(&self, messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| self.line(m))
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }

    pub fn estimated_tokens(&self, messages: &[Message]) -> usize {
        self.estimator.estimate(&self.format_history(messages))
    }

    /// Newest messages that fit in `max_tokens`, in chronological order.
    /// Stops at the first message that would overflow.
    pub fn truncated_history(&self, messages: &[Message], max_tokens: usize) -> String {
        let mut kept = Vec::new();
        let mut used = 0usize;

        for message in messages.iter().rev() {
            let line = self.line(message);
            let tokens = self.estimator.estimate(&line);
            if used + tokens > max_tokens {
                break;
            }
            used += tokens;
            kept.push(line);
        }

        kept.reverse();
        kept.join(LINE_SEPARATOR)
    }

    /// Compress with the configured turn count and budget.
    pub fn compress(&self, messages: &[Message]) -> String {
        self.compress_with(messages, self.recent_turns, self.max_tokens)
    }

    /// Recent `recent_turns` (user + assistant pairs) verbatim; older
    /// non-system messages truncated and packed into what is left of
    /// `budget_tokens`.
    pub fn compress_with(&self, messages: &[Message], recent_turns: usize, budget_tokens: usize) -> String {
        if messages.is_empty() {
            return String::new();
        }

        let recent_count = recent_turns.saturating_mul(2);
        if messages.len() <= recent_count {
            return self.format_history(messages);
        }

        let (older, recent) = messages.split_at(messages.len() - recent_count);
        let recent_text = self.format_history(recent);

        let remaining = self
            .estimator
            .chars_for_tokens(budget_tokens)
            .checked_sub(char_len(&recent_text))
            .and_then(|r| r.checked_sub(HEADER_OVERHEAD_CHARS))
            .filter(|r| *r > 0);
        let Some(remaining) = remaining else {
            tracing::debug!(older = older.len(), "No room for earlier history");
            return recent_text;
        };

        let older_text = self.compress_older(older, remaining);
        if older_text.is_empty() {
            return recent_text;
        }

        if recent_text.is_empty() {
            return format!("{EARLIER_HEADER}\n\n{older_text}");
        }
        format!("{EARLIER_HEADER}\n\n{older_text}\n\n{RECENT_HEADER}\n\n{recent_text}")
    }

    fn compress_older(&self, messages: &[Message], max_chars: usize) -> String {
        let mut lines = Vec::new();
        let mut total = 0usize;

        for message in messages.iter().filter(|m| m.role != Role::System) {
            let content = truncate_chars(&message.content, self.max_chars_per_message);
            let line = format!("{}: {content}", self.label(message.role));
            let cost = char_len(&line) + LINE_SEPARATOR.len();
            if total + cost > max_chars {
                break;
            }
            total += cost;
            lines.push(line);
        }

        let skipped = messages.len() - lines.len();
        if skipped > 0 {
            tracing::debug!(kept = lines.len(), skipped, "Compressed earlier history");
        }
        lines.join(LINE_SEPARATOR)
    }
}

impl Default for HistoryCompressor {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

/// Compress `turns` with default labels: the last `recent_verbatim_turns`
/// pairs verbatim, older messages previewed within `budget_tokens`.
pub fn compress(turns: &[Message], recent_verbatim_turns: usize, budget_tokens: usize) -> String {
    HistoryCompressor::default().compress_with(turns, recent_verbatim_turns, budget_tokens)
}

/// `text` cut to at most `max_chars` characters, ending in `...` when cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let head: String = text.chars().take(keep).collect();
    format!("{head}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {i}"))
                } else {
                    Message::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn empty_conversation_is_empty() {
        assert_eq!(compress(&[], 4, 2000), "");
    }

    #[test]
    fn short_conversation_is_verbatim() {
        let messages = conversation(3);
        assert_eq!(
            compress(&messages, 4, 2000),
            "User: question 0\n\nSelene: answer 1\n\nUser: question 2"
        );
    }

    #[test]
    fn long_conversation_marks_earlier_section() {
        let messages = conversation(12);
        let out = compress(&messages, 4, 2000);

        assert!(out.starts_with("[Earlier in conversation:]\n\nUser: question 0"));
        let (_, recent) = out.split_once("[Recent:]\n\n").unwrap();
        assert!(recent.starts_with("User: question 4"));
        assert!(recent.ends_with("Selene: answer 11"));
        assert_eq!(recent.matches(": ").count(), 8);
    }

    #[test]
    fn older_messages_truncated_to_100_chars() {
        let mut messages = vec![Message::user("z".repeat(300))];
        messages.extend(conversation(2));
        let out = compress(&messages, 1, 2000);
        let expected = format!("User: {}...", "z".repeat(97));
        assert!(out.contains(&expected));
        assert!(!out.contains(&"z".repeat(98)));
    }

    #[test]
    fn system_messages_skipped_in_older_section() {
        let mut messages = vec![Message::system("be nice"), Message::user("hello there")];
        messages.extend(conversation(2));
        let out = compress(&messages, 1, 2000);
        assert!(!out.contains("be nice"));
        assert!(out.contains("User: hello there"));
    }

    #[test]
    fn older_packing_stops_at_first_overflow() {
        let mut messages = vec![
            Message::user("x".repeat(80)),
            Message::user("short"),
        ];
        messages.extend(conversation(2));
        let recent_len = HistoryCompressor::default().format_history(&messages[2..]).chars().count();
        // Budget leaves room for the short line but not the long one.
        let budget_chars = recent_len + HEADER_OVERHEAD_CHARS + 20;
        let out = compress(&messages, 1, budget_chars.div_ceil(4));
        assert!(!out.contains("short"));
        assert!(!out.contains("[Earlier"));
    }

    #[test]
    fn tight_budget_returns_recent_only() {
        let messages = conversation(10);
        let out = compress(&messages, 2, 10);
        assert_eq!(out, HistoryCompressor::default().format_history(&messages[6..]));
    }

    #[test]
    fn zero_recent_turns_keeps_only_earlier() {
        let messages = conversation(2);
        let out = compress(&messages, 0, 2000);
        assert_eq!(out, "[Earlier in conversation:]\n\nUser: question 0\n\nSelene: answer 1");
    }

    #[test]
    fn assistant_label_is_configurable() {
        let compressor = HistoryCompressor::new(&HistoryConfig {
            assistant_name: "Luna".into(),
            ..HistoryConfig::default()
        });
        assert_eq!(
            compressor.format_history(&conversation(2)),
            "User: question 0\n\nLuna: answer 1"
        );
    }

    #[test]
    fn truncated_history_keeps_newest() {
        let compressor = HistoryCompressor::default();
        let messages = vec![
            Message::user("a".repeat(34)),      // "User: " + 34 = 40 chars = 10 tokens
            Message::assistant("b".repeat(32)), // "Selene: " + 32 = 40 chars = 10 tokens
            Message::user("c".repeat(34)),
        ];
        let out = compressor.truncated_history(&messages, 20);
        assert_eq!(out, format!("Selene: {}\n\nUser: {}", "b".repeat(32), "c".repeat(34)));
        assert_eq!(compressor.truncated_history(&messages, 5), "");
    }

    #[test]
    fn estimated_tokens_counts_formatted_history() {
        let compressor = HistoryCompressor::default();
        let messages = vec![Message::user("abcdefghij")]; // "User: abcdefghij" = 16 chars
        assert_eq!(compressor.estimated_tokens(&messages), 4);
    }
}
