use crate::model::{ExamRecord, QuestionId};

/// How often a question was answered right and wrong across all exams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAttemptStat {
    pub question_id: QuestionId,
    pub correct_attempts: u32,
    pub wrong_attempts: u32,
}

impl QuestionAttemptStat {
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.correct_attempts + self.wrong_attempts
    }

    /// Fraction of attempts answered wrong; `0.0` with no attempts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn wrong_ratio(&self) -> f64 {
        let total = self.total_attempts();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.wrong_attempts) / f64::from(total)
    }
}

/// Tallies attempts per question over the whole exam history.
///
/// Questions appear in first-encounter order across the flattened details.
#[must_use]
pub fn question_attempt_stats(exams: &[ExamRecord]) -> Vec<QuestionAttemptStat> {
    let mut stats: Vec<QuestionAttemptStat> = Vec::new();
    for detail in exams.iter().flat_map(|exam| exam.details()) {
        if let Some(stat) = stats
            .iter_mut()
            .find(|stat| stat.question_id == detail.question_id)
        {
            if detail.is_correct {
                stat.correct_attempts += 1;
            } else {
                stat.wrong_attempts += 1;
            }
        } else {
            stats.push(QuestionAttemptStat {
                question_id: detail.question_id.clone(),
                correct_attempts: u32::from(detail.is_correct),
                wrong_attempts: u32::from(!detail.is_correct),
            });
        }
    }
    stats
}

/// Questions whose historical wrong ratio meets the threshold.
#[must_use]
pub fn frequently_wrong(
    stats: &[QuestionAttemptStat],
    min_wrong_ratio: f64,
) -> Vec<QuestionAttemptStat> {
    stats
        .iter()
        .filter(|stat| stat.total_attempts() > 0 && stat.wrong_ratio() >= min_wrong_ratio)
        .cloned()
        .collect()
}
