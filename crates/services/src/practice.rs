use std::sync::Arc;

use storage::repository::ProgressRepository;
use theory_core::Clock;
use theory_core::model::{
    AnswerId, ProgressRecord, ProgressState, ProgressUpdate, QuestionId, UserId,
};

use crate::error::PracticeError;

/// The per-question practice state machine.
///
/// Unanswered → Selected → Revealed, per `(user, question)`. Selections may
/// be changed freely until reveal; reveal locks the question until the
/// user's whole progress is reset. Every operation takes the user
/// explicitly — there is no ambient identity.
///
/// Guest sessions run the exact same service over
/// `storage::repository::Storage::in_memory()`, so the volatile and
/// persisted paths cannot drift apart.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Select (or change) the answer for a question.
    ///
    /// Leaves the reveal flag untouched and returns the updated record so
    /// the caller can refresh its snapshot without a re-fetch. Re-selecting
    /// the same answer is observably a no-op, though it still issues the
    /// idempotent upsert.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::AlreadyRevealed` once the question's answer
    /// was disclosed, or a storage error with local state unchanged.
    pub async fn select_option(
        &self,
        user: UserId,
        question_id: &QuestionId,
        answer: AnswerId,
    ) -> Result<ProgressRecord, PracticeError> {
        if let Some(existing) = self.progress.find_progress(user, question_id).await? {
            if existing.answered {
                return Err(PracticeError::AlreadyRevealed(question_id.clone()));
            }
        }

        let record = self
            .progress
            .upsert_progress(
                user,
                question_id,
                &ProgressUpdate::selection(answer),
                self.clock.now(),
            )
            .await?;
        tracing::debug!(user = %user, question = %question_id, answer = %answer, "selection stored");
        Ok(record)
    }

    /// Disclose correctness for a question, marking it answered.
    ///
    /// With no prior selection the record is created revealed-but-blank,
    /// which every correctness computation counts as answered incorrectly.
    /// Revealing an already revealed question is a no-op patch.
    ///
    /// # Errors
    ///
    /// Returns a storage error with local state unchanged.
    pub async fn reveal_answer(
        &self,
        user: UserId,
        question_id: &QuestionId,
    ) -> Result<ProgressRecord, PracticeError> {
        let now = self.clock.now();
        let record = self
            .progress
            .upsert_progress(user, question_id, &ProgressUpdate::reveal(now), now)
            .await?;
        tracing::debug!(user = %user, question = %question_id, "answer revealed");
        Ok(record)
    }

    /// Current state of one question for UI gating.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lookup fails.
    pub async fn question_state(
        &self,
        user: UserId,
        question_id: &QuestionId,
    ) -> Result<ProgressState, PracticeError> {
        let record = self.progress.find_progress(user, question_id).await?;
        Ok(record.map_or(ProgressState::Unanswered, |record| record.state()))
    }

    /// Full progress snapshot for aggregation views.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub async fn load_progress(&self, user: UserId) -> Result<Vec<ProgressRecord>, PracticeError> {
        Ok(self.progress.list_progress(user).await?)
    }

    /// Delete the user's entire progress, returning every question to
    /// Unanswered. Destructive; callers confirm with the user first.
    ///
    /// # Errors
    ///
    /// Returns a storage error; records already deleted stay deleted.
    pub async fn reset_progress(&self, user: UserId) -> Result<usize, PracticeError> {
        let deleted = self.progress.delete_all_progress(user).await?;
        tracing::info!(user = %user, deleted, "practice progress reset");
        Ok(deleted)
    }
}
