//! Fidelity tier policy: how compactly a note should be rendered given its
//! age, whether it has an essence, and the state of its thread.

use chrono::{DateTime, Utc};
use selene_core::{FidelityTier, Note, ThreadStatus};

/// Notes younger than this always render in full.
pub const FRESH_DAYS: i64 = 7;
/// Notes younger than this stay at `High`.
pub const WARM_DAYS: i64 = 90;
/// Notes in an archived thread older than this drop to `Skeleton`.
pub const COLD_DAYS: i64 = 180;

/// Tier for a note of `age_days` in a thread with `thread_status`.
///
/// A note without an essence is never demoted below `Full`, since every
/// compact tier depends on it.
pub fn compute_tier(age_days: i64, has_essence: bool, thread_status: Option<ThreadStatus>) -> FidelityTier {
    if age_days < FRESH_DAYS || !has_essence {
        return FidelityTier::Full;
    }
    if thread_status == Some(ThreadStatus::Active) || age_days < WARM_DAYS {
        return FidelityTier::High;
    }
    if thread_status == Some(ThreadStatus::Archived) && age_days >= COLD_DAYS {
        return FidelityTier::Skeleton;
    }
    FidelityTier::Summary
}

/// Status that governs a note belonging to several threads: any active
/// thread wins, then any archived one. Other statuses do not affect the
/// tier.
pub fn governing_status<I>(statuses: I) -> Option<ThreadStatus>
where
    I: IntoIterator<Item = ThreadStatus>,
{
    let mut archived = false;
    for status in statuses {
        match status {
            ThreadStatus::Active => return Some(ThreadStatus::Active),
            ThreadStatus::Archived => archived = true,
            _ => {}
        }
    }
    archived.then_some(ThreadStatus::Archived)
}

/// Evaluate a note's tier as of `now`. Notes with no creation time are
/// treated as fresh.
pub fn evaluate(note: &Note, now: DateTime<Utc>, thread_status: Option<ThreadStatus>) -> FidelityTier {
    let age_days = note
        .created_at
        .map(|created| (now - created).num_days())
        .unwrap_or(0);
    let has_essence = note.essence.as_deref().is_some_and(|e| !e.trim().is_empty());
    compute_tier(age_days, has_essence, thread_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fresh_notes_are_full() {
        assert_eq!(compute_tier(0, true, Some(ThreadStatus::Archived)), FidelityTier::Full);
        assert_eq!(compute_tier(6, true, None), FidelityTier::Full);
    }

    #[test]
    fn no_essence_blocks_demotion() {
        assert_eq!(compute_tier(400, false, Some(ThreadStatus::Archived)), FidelityTier::Full);
    }

    #[test]
    fn active_thread_keeps_high() {
        assert_eq!(compute_tier(365, true, Some(ThreadStatus::Active)), FidelityTier::High);
    }

    #[test]
    fn warm_period_is_high() {
        assert_eq!(compute_tier(7, true, None), FidelityTier::High);
        assert_eq!(compute_tier(89, true, Some(ThreadStatus::Paused)), FidelityTier::High);
    }

    #[test]
    fn archived_and_cold_is_skeleton() {
        assert_eq!(compute_tier(180, true, Some(ThreadStatus::Archived)), FidelityTier::Skeleton);
        assert_eq!(compute_tier(179, true, Some(ThreadStatus::Archived)), FidelityTier::Summary);
    }

    #[test]
    fn cool_inactive_is_summary() {
        assert_eq!(compute_tier(90, true, None), FidelityTier::Summary);
        assert_eq!(compute_tier(500, true, Some(ThreadStatus::Completed)), FidelityTier::Summary);
    }

    #[test]
    fn active_outranks_archived() {
        let statuses = [ThreadStatus::Archived, ThreadStatus::Active];
        assert_eq!(governing_status(statuses), Some(ThreadStatus::Active));
        assert_eq!(governing_status([ThreadStatus::Archived]), Some(ThreadStatus::Archived));
        assert_eq!(governing_status([ThreadStatus::Paused]), None);
        assert_eq!(governing_status([]), None);
    }

    #[test]
    fn evaluate_uses_note_age() {
        let now = Utc::now();
        let note = Note::new(1, "Old", "text")
            .with_essence("gist")
            .with_created_at(now - Duration::days(200));
        assert_eq!(evaluate(&note, now, Some(ThreadStatus::Archived)), FidelityTier::Skeleton);

        let blank_essence = Note::new(2, "Old", "text")
            .with_essence("  ")
            .with_created_at(now - Duration::days(200));
        assert_eq!(evaluate(&blank_essence, now, None), FidelityTier::Full);

        let undated = Note::new(3, "New", "text").with_essence("gist");
        assert_eq!(evaluate(&undated, now, None), FidelityTier::Full);
    }
}
