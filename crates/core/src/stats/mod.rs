//! Pure aggregations over the raw question, progress, and exam record lists.
//!
//! Everything here is recomputed on demand from its inputs; there is no
//! hidden mutable state and no caching. Records referencing questions that
//! no longer exist in the bank are skipped, never an error.

mod attempts;
mod category;
mod exam_stats;
mod improvement;
mod streaks;

pub use attempts::{QuestionAttemptStat, frequently_wrong, question_attempt_stats};
pub use category::{CategoryStat, aggregate, aggregate_all};
pub use exam_stats::{ExamStats, Trend, exam_stats};
pub use improvement::{ImprovementStats, improvement_stats};
pub use streaks::{StreakStats, activity_dates, current_streak, streak_stats};

use crate::evaluate::is_correct_selection;
use crate::model::{ProgressRecord, Question};

/// Bank-wide completion and accuracy totals.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStat {
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// `correct / answered` as a fraction; `0.0` when nothing is answered.
    pub accuracy: f64,
    /// `answered / total_questions` as a fraction; `0.0` for an empty bank.
    pub completion: f64,
}

/// Totals over the whole bank, regardless of category.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overall(questions: &[Question], progress: &[ProgressRecord]) -> OverallStat {
    let total_questions = questions.len();
    let mut answered = 0;
    let mut correct = 0;

    for record in progress.iter().filter(|record| record.answered) {
        answered += 1;
        let Some(question) = questions.iter().find(|q| q.id == record.question_id) else {
            continue;
        };
        if is_correct_selection(question, record.selected_answer) {
            correct += 1;
        }
    }

    let accuracy = if answered > 0 {
        correct as f64 / answered as f64
    } else {
        0.0
    };
    let completion = if total_questions > 0 {
        answered as f64 / total_questions as f64
    } else {
        0.0
    };

    OverallStat {
        total_questions,
        answered,
        correct,
        incorrect: answered - correct,
        accuracy,
        completion,
    }
}
