//! Contextual retrieval for chat.
//!
//! Turns already-resolved signals (emotionally charged notes, task
//! outcomes, the week's sentiment, the state of the current thread) into
//! labelled [`ContextBlock`]s within a token budget.

use chrono::{DateTime, Utc};
use selene_core::{
    CharRatioEstimator, ContextBlock, ContextBlockType, Note, RetrievedContext, Thread, TokenEstimator,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TOKEN_BUDGET: usize = 3000;
const MAX_EMOTIONAL_NOTES: usize = 3;
const MAX_TASK_OUTCOMES: usize = 5;
const MAX_DECISIONS: usize = 3;
const MAX_RELEVANT_NOTES: usize = 3;
const NOTE_PREVIEW_CHARS: usize = 200;
const NEUTRAL_TONE: &str = "neutral";

// ── Signals ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Abandoned,
    Open,
}

impl TaskStatus {
    /// Short label used in task history lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "done",
            Self::Abandoned => "abandoned",
            Self::Open => "open",
        }
    }
}

/// How a task related to the conversation topic turned out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub title: String,
    pub status: TaskStatus,
    /// Days between creation and completion (or now, if still open)
    pub days_open: u32,
}

/// Emotional tone distribution over a recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrend {
    /// e.g. `{"frustrated": 4, "anxious": 2, "calm": 1}`
    pub tone_counts: BTreeMap<String, usize>,
    pub total_notes: usize,
    #[serde(default = "default_period_days")]
    pub period_days: u32,
}

fn default_period_days() -> u32 {
    7
}

impl Default for SentimentTrend {
    fn default() -> Self {
        Self {
            tone_counts: BTreeMap::new(),
            total_notes: 0,
            period_days: default_period_days(),
        }
    }
}

impl SentimentTrend {
    fn non_neutral(&self) -> Vec<(&str, usize)> {
        let mut tones: Vec<(&str, usize)> = self
            .tone_counts
            .iter()
            .filter(|(tone, _)| tone.as_str() != NEUTRAL_TONE)
            .map(|(tone, count)| (tone.as_str(), *count))
            .collect();
        // Stable: equal counts stay in alphabetical order.
        tones.sort_by(|a, b| b.1.cmp(&a.1));
        tones
    }

    /// Most frequent non-neutral tone.
    pub fn dominant_tone(&self) -> Option<&str> {
        self.non_neutral().first().map(|(tone, _)| *tone)
    }

    /// `frustrated 4x, anxious 2x`, or `mostly neutral`.
    pub fn formatted(&self) -> String {
        let tones = self.non_neutral();
        if tones.is_empty() {
            return "mostly neutral".to_string();
        }
        tones
            .iter()
            .map(|(tone, count)| format!("{tone} {count}x"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `This week` for a seven-day window, `Today` for one day, otherwise
    /// `Last N days`.
    pub fn period_label(&self) -> String {
        match self.period_days {
            1 => "Today".to_string(),
            7 => "This week".to_string(),
            days => format!("Last {days} days"),
        }
    }

    /// `This week (6 notes): frustrated 4x, anxious 2x`
    pub fn summary(&self) -> String {
        format!("{} ({} notes): {}", self.period_label(), self.total_notes, self.formatted())
    }
}

/// The thread a conversation is scoped to, with its open task count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSnapshot {
    pub thread: Thread,
    pub open_tasks: usize,
}

/// Everything the retriever may draw on for one request, most relevant
/// first within each list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSignals {
    #[serde(default)]
    pub emotional_notes: Vec<Note>,
    #[serde(default)]
    pub task_outcomes: Vec<TaskOutcome>,
    #[serde(default)]
    pub sentiment_trend: Option<SentimentTrend>,
    #[serde(default)]
    pub thread: Option<ThreadSnapshot>,
    /// Notes recording past decisions on the topic
    #[serde(default)]
    pub decisions: Vec<Note>,
    /// Topically related notes, e.g. from vector search
    #[serde(default)]
    pub relevant_notes: Vec<Note>,
}

// ── Retriever ─────────────────────────────────────────────────────────────

pub struct ContextualRetriever {
    token_budget: usize,
    estimator: CharRatioEstimator,
}

impl ContextualRetriever {
    pub fn new(token_budget: usize) -> Self {
        Self {
            token_budget,
            estimator: CharRatioEstimator::default(),
        }
    }

    /// Assemble blocks in order: emotional history, task history, sentiment
    /// trend, thread state, decisions, relevant notes. A block is kept only
    /// if it leaves some budget unspent; each note list stops at the first
    /// note that does not.
    pub fn retrieve(&self, signals: &ContextSignals, now: DateTime<Utc>) -> RetrievedContext {
        let mut budget = Budget {
            remaining: self.token_budget,
            estimator: &self.estimator,
        };
        let mut blocks = Vec::new();

        let emotional = &signals.emotional_notes[..signals.emotional_notes.len().min(MAX_EMOTIONAL_NOTES)];
        budget.admit_notes(ContextBlockType::EmotionalHistory, emotional, &mut blocks);

        let outcomes: Vec<&TaskOutcome> = signals.task_outcomes.iter().take(MAX_TASK_OUTCOMES).collect();
        if !outcomes.is_empty() {
            let block = task_block(&outcomes);
            if budget.admit(&block) {
                blocks.push(block);
            }
        }

        if let Some(trend) = signals.sentiment_trend.as_ref().filter(|t| t.total_notes > 0) {
            let block = ContextBlock::new(ContextBlockType::SentimentTrend, trend.summary());
            if budget.admit(&block) {
                blocks.push(block);
            }
        }

        if let Some(snapshot) = &signals.thread {
            let block = thread_block(snapshot, now);
            if budget.admit(&block) {
                blocks.push(block);
            }
        }

        let decisions = &signals.decisions[..signals.decisions.len().min(MAX_DECISIONS)];
        budget.admit_notes(ContextBlockType::DecisionHistory, decisions, &mut blocks);

        let relevant = &signals.relevant_notes[..signals.relevant_notes.len().min(MAX_RELEVANT_NOTES)];
        budget.admit_notes(ContextBlockType::RelevantNote, relevant, &mut blocks);

        tracing::debug!(
            blocks = blocks.len(),
            remaining_tokens = budget.remaining,
            "Retrieved contextual blocks"
        );
        RetrievedContext::new(blocks)
    }
}

impl Default for ContextualRetriever {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_BUDGET)
    }
}

struct Budget<'a> {
    remaining: usize,
    estimator: &'a CharRatioEstimator,
}

impl Budget<'_> {
    fn admit(&mut self, block: &ContextBlock) -> bool {
        let tokens = self.estimator.estimate(&block.formatted());
        if tokens >= self.remaining {
            return false;
        }
        self.remaining -= tokens;
        true
    }

    /// One block per note, stopping at the first that does not fit.
    fn admit_notes(&mut self, block_type: ContextBlockType, notes: &[Note], blocks: &mut Vec<ContextBlock>) {
        for note in notes {
            let block = note_block(block_type, note);
            if !self.admit(&block) {
                break;
            }
            blocks.push(block);
        }
    }
}

/// Essence, or the start of the content, dated and titled.
fn note_block(block_type: ContextBlockType, note: &Note) -> ContextBlock {
    let content = match note.essence.as_deref().filter(|e| !e.is_empty()) {
        Some(essence) => essence.to_string(),
        None => note.content.chars().take(NOTE_PREVIEW_CHARS).collect(),
    };
    ContextBlock::new(block_type, content).with_source(note.created_at, Some(note.title.clone()))
}

fn task_block(outcomes: &[&TaskOutcome]) -> ContextBlock {
    let summary = outcomes
        .iter()
        .map(|o| format!("{} ({}, {}d)", o.title, o.status.label(), o.days_open))
        .collect::<Vec<_>>()
        .join("; ");
    ContextBlock::new(ContextBlockType::TaskHistory, summary)
}

fn thread_block(snapshot: &ThreadSnapshot, now: DateTime<Utc>) -> ContextBlock {
    let thread = &snapshot.thread;
    let idle_days = thread
        .last_activity_at
        .map(|at| (now - at).num_days().max(0))
        .unwrap_or(0);
    ContextBlock::new(
        ContextBlockType::ThreadState,
        format!(
            "'{}' \u{2014} {}, {} notes, {} open tasks, last activity {}d ago, momentum {}",
            thread.name,
            thread.status,
            thread.note_count,
            snapshot.open_tasks,
            idle_days,
            thread.momentum_display()
        ),
    )
}
