use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AnswerId, ExamId, QuestionId, RecordId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamRecordError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("detail count ({details}) does not match total questions ({total})")]
    DetailCountMismatch { details: usize, total: u32 },
}

/// Scoring outcome for one drawn question within an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub selected_answer_id: Option<AnswerId>,
    pub correct_answer_id: AnswerId,
    pub is_correct: bool,
}

/// An archived exam attempt.
///
/// Written exactly once at submission and never updated or deleted by normal
/// use; history and statistics views consume it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRecord {
    id: RecordId,
    user_id: UserId,
    exam_id: ExamId,
    timestamp: DateTime<Utc>,
    total_questions: u32,
    correct_answers: u32,
    details: Vec<AnswerDetail>,
}

impl ExamRecord {
    /// Rehydrate an exam record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ExamRecordError` if the counts do not align.
    pub fn from_persisted(
        id: RecordId,
        user_id: UserId,
        exam_id: ExamId,
        timestamp: DateTime<Utc>,
        total_questions: u32,
        correct_answers: u32,
        details: Vec<AnswerDetail>,
    ) -> Result<Self, ExamRecordError> {
        if correct_answers > total_questions {
            return Err(ExamRecordError::CorrectExceedsTotal {
                correct: correct_answers,
                total: total_questions,
            });
        }
        if details.len() != total_questions as usize {
            return Err(ExamRecordError::DetailCountMismatch {
                details: details.len(),
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            user_id,
            exam_id,
            timestamp,
            total_questions,
            correct_answers,
            details,
        })
    }

    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn details(&self) -> &[AnswerDetail] {
        &self.details
    }

    /// Score normalized to percent (`0.0` for an empty exam).
    #[must_use]
    pub fn score_percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.total_questions) * 100.0
    }
}

/// An exam record about to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExamRecord {
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub timestamp: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub details: Vec<AnswerDetail>,
}

impl NewExamRecord {
    /// Build a record from scored details, deriving both counts.
    ///
    /// # Errors
    ///
    /// Returns `ExamRecordError::DetailCountMismatch` if the detail list
    /// cannot be counted in `u32`.
    pub fn from_details(
        user_id: UserId,
        exam_id: ExamId,
        timestamp: DateTime<Utc>,
        details: Vec<AnswerDetail>,
    ) -> Result<Self, ExamRecordError> {
        let total_questions =
            u32::try_from(details.len()).map_err(|_| ExamRecordError::DetailCountMismatch {
                details: details.len(),
                total: u32::MAX,
            })?;
        let correct_answers = details.iter().filter(|detail| detail.is_correct).count();
        let correct_answers = u32::try_from(correct_answers).unwrap_or(total_questions);

        Ok(Self {
            user_id,
            exam_id,
            timestamp,
            total_questions,
            correct_answers,
            details,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn detail(question: &str, is_correct: bool) -> AnswerDetail {
        AnswerDetail {
            question_id: QuestionId::new(question),
            selected_answer_id: Some(AnswerId::new(1)),
            correct_answer_id: AnswerId::new(1),
            is_correct,
        }
    }

    #[test]
    fn from_details_counts_correct_answers() {
        let record = NewExamRecord::from_details(
            UserId::new(1),
            ExamId::new(3),
            fixed_now(),
            vec![detail("1", true), detail("2", false), detail("3", true)],
        )
        .unwrap();

        assert_eq!(record.total_questions, 3);
        assert_eq!(record.correct_answers, 2);
    }

    #[test]
    fn persisted_record_rejects_count_mismatch() {
        let err = ExamRecord::from_persisted(
            RecordId::new(1),
            UserId::new(1),
            ExamId::new(1),
            fixed_now(),
            2,
            3,
            vec![detail("1", true), detail("2", true)],
        )
        .unwrap_err();
        assert!(matches!(err, ExamRecordError::CorrectExceedsTotal { .. }));

        let err = ExamRecord::from_persisted(
            RecordId::new(1),
            UserId::new(1),
            ExamId::new(1),
            fixed_now(),
            3,
            1,
            vec![detail("1", true)],
        )
        .unwrap_err();
        assert!(matches!(err, ExamRecordError::DetailCountMismatch { .. }));
    }

    #[test]
    fn score_normalizes_to_percent() {
        let record = ExamRecord::from_persisted(
            RecordId::new(1),
            UserId::new(1),
            ExamId::new(1),
            fixed_now(),
            4,
            3,
            vec![
                detail("1", true),
                detail("2", true),
                detail("3", true),
                detail("4", false),
            ],
        )
        .unwrap();
        assert!((record.score_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_exam_scores_zero() {
        let record = ExamRecord::from_persisted(
            RecordId::new(1),
            UserId::new(1),
            ExamId::new(1),
            fixed_now(),
            0,
            0,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(record.score_percent(), 0.0);
    }
}
