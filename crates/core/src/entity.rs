//! Renderable entities: notes, threads, and the fidelity tiers they are
//! rendered at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// How much of an entity is rendered into context.
///
/// Ordered from richest to most compact: `Full < High < Summary < Skeleton`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FidelityTier {
    /// Title and full content
    #[default]
    Full,
    /// Title, essence, and full content
    High,
    /// Title, theme, and essence (or a fallback preview)
    Summary,
    /// A single line: title and theme
    Skeleton,
}

impl FidelityTier {
    pub const ALL: [FidelityTier; 4] = [Self::Full, Self::High, Self::Summary, Self::Skeleton];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::High => "high",
            Self::Summary => "summary",
            Self::Skeleton => "skeleton",
        }
    }
}

impl std::fmt::Display for FidelityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FidelityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "high" => Ok(Self::High),
            "summary" => Ok(Self::Summary),
            "skeleton" => Ok(Self::Skeleton),
            other => Err(Error::InvalidInput(format!("unknown fidelity tier: {other}"))),
        }
    }
}

/// A captured note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,

    pub title: String,

    /// Full note body
    pub content: String,

    /// One-line distillation of the note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essence: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_theme: Option<String>,

    /// Extracted concepts, most salient first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,

    /// Tier assigned by the fidelity policy
    #[serde(default)]
    pub fidelity_tier: FidelityTier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a full-fidelity note with no derived fields.
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            essence: None,
            primary_theme: None,
            concepts: None,
            fidelity_tier: FidelityTier::Full,
            created_at: None,
        }
    }

    pub fn with_essence(mut self, essence: impl Into<String>) -> Self {
        self.essence = Some(essence.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.primary_theme = Some(theme.into());
        self
    }

    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concepts = Some(concepts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tier(mut self, tier: FidelityTier) -> Self {
        self.fidelity_tier = tier;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Lifecycle state of a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Abandoned,
    Archived,
}

impl ThreadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cluster of related notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,

    pub name: String,

    /// Condensed narrative of the whole thread; preferred over `summary`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Why this thread emerged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,

    pub note_count: usize,

    #[serde(default)]
    pub status: ThreadStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl Thread {
    pub fn new(id: i64, name: impl Into<String>, note_count: usize) -> Self {
        Self {
            id,
            name: name.into(),
            digest: None,
            summary: None,
            why: None,
            note_count,
            status: ThreadStatus::Active,
            momentum_score: None,
            last_activity_at: None,
        }
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    pub fn with_status(mut self, status: ThreadStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_momentum(mut self, score: f64) -> Self {
        self.momentum_score = Some(score);
        self
    }

    /// Momentum to one decimal place, or an em dash when unscored.
    pub fn momentum_display(&self) -> String {
        match self.momentum_score {
            Some(score) => format!("{score:.1}"),
            None => "\u{2014}".to_string(),
        }
    }
}
