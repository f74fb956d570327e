use chrono::{DateTime, Duration, Utc};
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use storage::repository::{ExamRepository, QuestionRepository};
use theory_core::Clock;
use theory_core::evaluate::is_correct_selection;
use theory_core::model::{
    AnswerDetail, AnswerId, ExamId, ExamRecord, ExamSettings, NewExamRecord, Question, QuestionId,
    UserId,
};

use crate::error::ExamError;

//
// ─── EXAM SESSION ──────────────────────────────────────────────────────────────
//

/// Aggregated view of how far an exam attempt has come, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
}

/// One in-memory exam attempt.
///
/// InProgress → Submitted, nothing else: there is no resume, and abandoning
/// the session (dropping it) leaves no partial record anywhere. Selections
/// live only here until submission — practice progress is never touched by
/// an exam.
pub struct ExamSession {
    exam_id: ExamId,
    questions: Vec<Question>,
    selections: HashMap<QuestionId, AnswerId>,
    started_at: DateTime<Utc>,
    duration: Duration,
    submitted: Option<ExamRecord>,
}

impl ExamSession {
    pub(crate) fn new(
        exam_id: ExamId,
        questions: Vec<Question>,
        settings: &ExamSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ExamError> {
        if questions.is_empty() {
            return Err(ExamError::EmptyBank);
        }
        Ok(Self {
            exam_id,
            questions,
            selections: HashMap::new(),
            started_at,
            duration: settings.duration(),
            submitted: None,
        })
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }

    /// The archived record, once submission succeeded.
    #[must_use]
    pub fn submitted_record(&self) -> Option<&ExamRecord> {
        self.submitted.as_ref()
    }

    #[must_use]
    pub fn selection(&self, question_id: &QuestionId) -> Option<AnswerId> {
        self.selections.get(question_id).copied()
    }

    /// Returns a summary of the current attempt progress.
    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        let total = self.questions.len();
        let answered = self.selections.len();
        ExamProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
        }
    }

    /// Time left on the countdown as seen at `now`, floored at zero.
    ///
    /// Purely a view for the caller's one-second tick; the engine never
    /// blocks on it and expiry does not auto-submit.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Duration {
        let deadline = self.started_at + self.duration;
        (deadline - now).max(Duration::zero())
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_time(now) == Duration::zero()
    }

    /// Record (or overwrite) the choice for a drawn question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadySubmitted` after submission and
    /// `ExamError::UnknownQuestion` for questions outside the draw.
    pub fn select_answer(
        &mut self,
        question_id: &QuestionId,
        answer: AnswerId,
    ) -> Result<(), ExamError> {
        if self.is_submitted() {
            return Err(ExamError::AlreadySubmitted);
        }
        if !self.questions.iter().any(|question| question.id == *question_id) {
            return Err(ExamError::UnknownQuestion(question_id.clone()));
        }
        self.selections.insert(question_id.clone(), answer);
        Ok(())
    }

    /// Score every drawn question against the recorded selections.
    ///
    /// A missing selection scores as incorrect, never as an error.
    pub(crate) fn score_details(&self) -> Vec<AnswerDetail> {
        self.questions
            .iter()
            .map(|question| {
                let selected = self.selection(&question.id);
                // banks are expected to mark exactly one option correct;
                // fall back to the first option rather than panic
                let correct_id = question
                    .correct_option()
                    .or_else(|| question.answers.first())
                    .map_or(AnswerId::new(0), |option| option.id);
                AnswerDetail {
                    question_id: question.id.clone(),
                    selected_answer_id: selected,
                    correct_answer_id: correct_id,
                    is_correct: is_correct_selection(question, selected),
                }
            })
            .collect()
    }

    pub(crate) fn mark_submitted(&mut self, record: ExamRecord) {
        self.submitted = Some(record);
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("exam_id", &self.exam_id)
            .field("questions_len", &self.questions.len())
            .field("selections_len", &self.selections.len())
            .field("started_at", &self.started_at)
            .field("submitted", &self.submitted.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── EXAM SERVICE ──────────────────────────────────────────────────────────────
//

/// Orchestrates the random draw and the exactly-once submission write.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    settings: ExamSettings,
    questions: Arc<dyn QuestionRepository>,
    exams: Arc<dyn ExamRepository>,
}

impl ExamService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        exams: Arc<dyn ExamRepository>,
    ) -> Self {
        Self {
            clock,
            settings: ExamSettings::official(),
            questions,
            exams,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ExamSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ExamSettings {
        &self.settings
    }

    /// Start a timed attempt with a uniformly random draw from the bank.
    ///
    /// Sampling is without replacement; a bank shorter than the configured
    /// draw yields the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyBank` when there is nothing to draw, or a
    /// storage error if the bank cannot be read.
    pub async fn start_session(&self, exam_id: ExamId) -> Result<ExamSession, ExamError> {
        let mut bank = self.questions.list_questions().await?;
        if bank.is_empty() {
            return Err(ExamError::EmptyBank);
        }

        bank.shuffle(&mut rng());
        let count = usize::try_from(self.settings.question_count()).unwrap_or(usize::MAX);
        bank.truncate(count);

        tracing::debug!(exam = %exam_id, drawn = bank.len(), "exam session started");
        ExamSession::new(exam_id, bank, &self.settings, self.clock.now())
    }

    /// Score the attempt and archive it as one immutable record.
    ///
    /// Callers gate this behind an explicit confirmation prompt; declining
    /// the prompt simply means not calling `submit`, which leaves the
    /// session untouched. The session transitions to Submitted only after
    /// the write succeeds — a failed write keeps it InProgress so the
    /// caller can retry. Submitting an already submitted session returns
    /// the archived record again without touching the store, so a double
    /// trigger can never produce a second record.
    ///
    /// # Errors
    ///
    /// Returns a storage error if archiving fails (session stays
    /// InProgress).
    pub async fn submit(
        &self,
        session: &mut ExamSession,
        user: UserId,
    ) -> Result<ExamRecord, ExamError> {
        if let Some(record) = session.submitted_record() {
            return Ok(record.clone());
        }

        let details = session.score_details();
        let new_record =
            NewExamRecord::from_details(user, session.exam_id(), self.clock.now(), details)?;
        let record = self.exams.create_exam(&new_record).await?;

        tracing::info!(
            user = %user,
            exam = %session.exam_id(),
            correct = record.correct_answers(),
            total = record.total_questions(),
            "exam submitted"
        );
        session.mark_submitted(record.clone());
        Ok(record)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use theory_core::model::AnswerOption;
    use theory_core::time::fixed_now;

    fn build_question(id: u64) -> Question {
        Question {
            id: QuestionId::new(id.to_string()),
            text: format!("question {id}"),
            answers: vec![
                AnswerOption {
                    id: AnswerId::new(1),
                    content: "right".to_string(),
                    correct: true,
                },
                AnswerOption {
                    id: AnswerId::new(2),
                    content: "wrong".to_string(),
                    correct: false,
                },
            ],
            categories: Vec::new(),
            compulsory: false,
            image_url: None,
        }
    }

    fn build_session(count: u64) -> ExamSession {
        let questions = (1..=count).map(build_question).collect();
        ExamSession::new(
            ExamId::new(1),
            questions,
            &ExamSettings::official(),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_draw_is_rejected() {
        let err = ExamSession::new(
            ExamId::new(1),
            Vec::new(),
            &ExamSettings::official(),
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, ExamError::EmptyBank));
    }

    #[test]
    fn selections_overwrite_and_track_progress() {
        let mut session = build_session(3);
        session
            .select_answer(&QuestionId::new("1"), AnswerId::new(2))
            .unwrap();
        session
            .select_answer(&QuestionId::new("1"), AnswerId::new(1))
            .unwrap();
        session
            .select_answer(&QuestionId::new("2"), AnswerId::new(1))
            .unwrap();

        assert_eq!(session.selection(&QuestionId::new("1")), Some(AnswerId::new(1)));
        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 1);
    }

    #[test]
    fn selecting_outside_the_draw_is_rejected() {
        let mut session = build_session(2);
        let err = session
            .select_answer(&QuestionId::new("99"), AnswerId::new(1))
            .unwrap_err();
        assert!(matches!(err, ExamError::UnknownQuestion(_)));
    }

    #[test]
    fn countdown_is_a_pure_view() {
        let session = build_session(1);
        let start = session.started_at();

        assert_eq!(session.remaining_time(start), Duration::seconds(1140));
        assert_eq!(
            session.remaining_time(start + Duration::seconds(100)),
            Duration::seconds(1040)
        );
        assert!(!session.is_expired(start + Duration::seconds(1139)));
        assert!(session.is_expired(start + Duration::seconds(1140)));
        // past the deadline the view floors at zero
        assert_eq!(
            session.remaining_time(start + Duration::seconds(5000)),
            Duration::zero()
        );
    }

    #[test]
    fn scoring_counts_missing_selection_as_incorrect() {
        let mut session = build_session(3);
        session
            .select_answer(&QuestionId::new("1"), AnswerId::new(1))
            .unwrap();
        session
            .select_answer(&QuestionId::new("2"), AnswerId::new(2))
            .unwrap();
        // question 3 left unanswered

        let details = session.score_details();
        assert_eq!(details.len(), 3);
        assert!(details[0].is_correct);
        assert!(!details[1].is_correct);
        assert!(!details[2].is_correct);
        assert_eq!(details[2].selected_answer_id, None);
        assert_eq!(details[2].correct_answer_id, AnswerId::new(1));
    }
}
