//! Labelled units of retrieved evidence for chat-side context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::token::estimate_tokens;

/// What kind of evidence a [`ContextBlock`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextBlockType {
    RelevantNote,
    EmotionalHistory,
    DecisionHistory,
    TaskHistory,
    SentimentTrend,
    ThreadState,
}

impl ContextBlockType {
    /// The bracketed label shown to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RelevantNote => "RELEVANT NOTE",
            Self::EmotionalHistory => "EMOTIONAL HISTORY",
            Self::DecisionHistory => "DECISION",
            Self::TaskHistory => "TASK HISTORY",
            Self::SentimentTrend => "EMOTIONAL TREND",
            Self::ThreadState => "THREAD STATE",
        }
    }
}

/// One labelled piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBlock {
    pub block_type: ContextBlockType,

    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl ContextBlock {
    pub fn new(block_type: ContextBlockType, content: impl Into<String>) -> Self {
        Self {
            block_type,
            content: content.into(),
            source_date: None,
            source_title: None,
        }
    }

    pub fn with_source(mut self, date: Option<DateTime<Utc>>, title: Option<String>) -> Self {
        self.source_date = date;
        self.source_title = title;
        self
    }

    /// `[LABEL - Mon d — title]: content`; date and title only when present.
    pub fn formatted(&self) -> String {
        let date = self
            .source_date
            .map(|d| format!(" - {}", d.format("%b %-d")))
            .unwrap_or_default();
        let title = self
            .source_title
            .as_deref()
            .map(|t| format!(" \u{2014} {t}"))
            .unwrap_or_default();
        format!("[{}{date}{title}]: {}", self.block_type.label(), self.content)
    }
}

/// The blocks selected for one request, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub blocks: Vec<ContextBlock>,
}

impl RetrievedContext {
    pub fn new(blocks: Vec<ContextBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// One formatted block per line.
    pub fn formatted(&self) -> String {
        self.blocks
            .iter()
            .map(ContextBlock::formatted)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.formatted())
    }
}
