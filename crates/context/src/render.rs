//! Tiered rendering of notes, threads and retrieved chunks into context
//! text.
//!
//! Rendering is pure: the same entity and tier always produce the same
//! string.

use selene_core::{Chunk, FidelityTier, Note, ScoredChunk, Thread};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Characters of content shown when a summary has nothing better.
const FALLBACK_CONTENT_CHARS: usize = 150;
/// Concepts listed in a summary fallback.
const FALLBACK_CONCEPTS: usize = 5;

/// Something that can be rendered into a context block at a fidelity tier.
pub trait Render {
    fn render(&self, tier: FidelityTier) -> String;

    /// The tier this entity asks for when the caller has no preference.
    fn assigned_tier(&self) -> FidelityTier {
        FidelityTier::Full
    }
}

/// A note or a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Note(Note),
    Thread(Thread),
}

impl Render for Entity {
    fn render(&self, tier: FidelityTier) -> String {
        match self {
            Self::Note(note) => note.render(tier),
            Self::Thread(thread) => thread.render(tier),
        }
    }

    fn assigned_tier(&self) -> FidelityTier {
        match self {
            Self::Note(note) => note.assigned_tier(),
            Self::Thread(thread) => thread.assigned_tier(),
        }
    }
}

impl From<Note> for Entity {
    fn from(note: Note) -> Self {
        Self::Note(note)
    }
}

impl From<Thread> for Entity {
    fn from(thread: Thread) -> Self {
        Self::Thread(thread)
    }
}

impl Render for Note {
    fn render(&self, tier: FidelityTier) -> String {
        let title = &self.title;
        match tier {
            FidelityTier::Full => format!("--- {title} ---\n{}", self.content),
            FidelityTier::High => match present(&self.essence) {
                Some(essence) => format!("--- {title} ---\n[Essence] {essence}\n{}", self.content),
                None => format!("--- {title} ---\n{}", self.content),
            },
            FidelityTier::Summary => match present(&self.essence) {
                Some(essence) => {
                    let theme = present(&self.primary_theme)
                        .map(|t| format!(" [{t}]"))
                        .unwrap_or_default();
                    format!("--- {title}{theme} ---\n{essence}")
                }
                None => format!("--- {title} ---\n{}", fallback_preview(self)),
            },
            FidelityTier::Skeleton => {
                let theme = present(&self.primary_theme).unwrap_or("unthemed");
                format!("- {title} [{theme}]")
            }
        }
    }

    fn assigned_tier(&self) -> FidelityTier {
        self.fidelity_tier
    }
}

/// Threads render the same at every tier.
impl Render for Thread {
    fn render(&self, _tier: FidelityTier) -> String {
        let mut lines = vec![format!(
            "=== Thread: {} ({} notes) ===",
            self.name, self.note_count
        )];

        if let Some(digest) = present(&self.digest) {
            lines.push(digest.to_string());
        } else if let Some(summary) = present(&self.summary) {
            lines.push(summary.to_string());
            if let Some(why) = present(&self.why) {
                lines.push(format!("Motivation: {why}"));
            }
        }

        lines.join("\n")
    }
}

/// Render a note at full fidelity regardless of its assigned tier.
pub fn render_full(note: &Note) -> String {
    note.render(FidelityTier::Full)
}

/// A retrieved chunk as evidence: `[topic] text`, or just the text.
pub fn render_chunk(chunk: &Chunk) -> String {
    match present(&chunk.topic) {
        Some(topic) => format!("[{topic}] {}", chunk.text),
        None => chunk.text.clone(),
    }
}

/// Pinned chunks followed by retrieved ones, skipping any chunk id already
/// shown, each rendered with [`render_chunk`] and separated by blank lines.
pub fn render_chunk_section(pinned: &[Chunk], retrieved: &[ScoredChunk]) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    pinned
        .iter()
        .chain(retrieved.iter().map(|s| &s.chunk))
        .filter(|chunk| seen.insert(chunk.id.as_str()))
        .map(render_chunk)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Summary body for a note with no essence: its concepts, else the head of
/// its content.
fn fallback_preview(note: &Note) -> String {
    if let Some(concepts) = note.concepts.as_ref().filter(|c| !c.is_empty()) {
        let listed: Vec<&str> = concepts
            .iter()
            .take(FALLBACK_CONCEPTS)
            .map(String::as_str)
            .collect();
        return format!("Concepts: {}", listed.join(", "));
    }

    let mut chars = note.content.chars();
    let head: String = chars.by_ref().take(FALLBACK_CONTENT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
