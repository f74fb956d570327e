use chrono::{DateTime, Duration, Utc};

use crate::evaluate::is_correct_selection;
use crate::model::{Category, ProgressRecord, Question};
use crate::stats::CategoryStat;

/// Learning-pace indicators shown alongside the main statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementStats {
    /// Revealed questions whose current selection is correct.
    pub questions_improved: usize,
    /// Progress records with activity in the trailing seven days.
    pub weekly_progress: usize,
    /// `weekly_progress / 7`, rounded — records per day.
    pub learning_velocity: u32,
    /// Category with the highest accuracy (first wins on ties).
    pub strongest_category: Option<Category>,
    /// Category with the lowest accuracy (first wins on ties).
    pub weakest_category: Option<Category>,
}

/// Derives improvement indicators from the progress snapshot.
///
/// `category_stats` should come from [`crate::stats::aggregate_all`] over
/// the same snapshot so the strongest/weakest picks line up with the rest
/// of the statistics view.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn improvement_stats(
    questions: &[Question],
    progress: &[ProgressRecord],
    category_stats: &[CategoryStat],
    now: DateTime<Utc>,
) -> ImprovementStats {
    let questions_improved = progress
        .iter()
        .filter(|record| record.answered)
        .filter(|record| {
            questions
                .iter()
                .find(|question| question.id == record.question_id)
                .is_some_and(|question| is_correct_selection(question, record.selected_answer))
        })
        .count();

    let week_ago = now - Duration::days(7);
    let weekly_progress = progress
        .iter()
        .filter(|record| {
            record
                .answered_at
                .or(record.created_at)
                .is_some_and(|at| at >= week_ago)
        })
        .count();
    let learning_velocity = (weekly_progress as f64 / 7.0).round() as u32;

    let mut strongest: Option<&CategoryStat> = None;
    let mut weakest: Option<&CategoryStat> = None;
    for stat in category_stats {
        match strongest {
            Some(best) if stat.accuracy <= best.accuracy => {}
            _ => strongest = Some(stat),
        }
        match weakest {
            Some(worst) if stat.accuracy >= worst.accuracy => {}
            _ => weakest = Some(stat),
        }
    }

    ImprovementStats {
        questions_improved,
        weekly_progress,
        learning_velocity,
        strongest_category: strongest.map(|stat| stat.category),
        weakest_category: weakest.map(|stat| stat.category),
    }
}
