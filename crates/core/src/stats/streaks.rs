use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::model::ProgressRecord;

/// Study-day continuity derived from progress activity timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakStats {
    /// Consecutive days with activity, walking back from today.
    pub current_streak: u32,
    /// Equal to `current_streak`; no historical maximum is tracked.
    pub longest_streak: u32,
    /// Distinct calendar days with any recorded activity.
    pub total_study_days: usize,
    /// Rough time-on-task estimate: two minutes per progress record.
    pub average_session_minutes: u32,
}

/// Distinct UTC calendar dates carrying progress activity.
///
/// Records without any timestamp are ignored rather than attributed to
/// some arbitrary day.
#[must_use]
pub fn activity_dates(progress: &[ProgressRecord]) -> BTreeSet<NaiveDate> {
    progress
        .iter()
        .filter_map(ProgressRecord::activity_date)
        .collect()
}

/// Counts consecutive active days ending at `today`.
///
/// The walk stops at the first day without activity; a quiet `today`
/// therefore yields zero even when yesterday was active.
#[must_use]
pub fn current_streak(progress: &[ProgressRecord], today: NaiveDate) -> u32 {
    let dates = activity_dates(progress);
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        let Some(previous) = day.pred_opt() else {
            break;
        };
        day = previous;
    }
    streak
}

/// Derives all streak statistics in one pass.
#[must_use]
pub fn streak_stats(progress: &[ProgressRecord], today: NaiveDate) -> StreakStats {
    let current = current_streak(progress, today);
    let minutes = progress.len().saturating_mul(2);

    StreakStats {
        current_streak: current,
        longest_streak: current,
        total_study_days: activity_dates(progress).len(),
        average_session_minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
    }
}
