use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use theory_core::model::{
    Category, ExamRecord, NewExamRecord, NewProgress, ProgressRecord, ProgressUpdate, Question,
    QuestionId, RecordId, UserId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Read-only view over the external question collection.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch the full question bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Fetch the questions belonging to one category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn questions_in_category(
        &self,
        category: Category,
    ) -> Result<Vec<Question>, StorageError> {
        let questions = self.list_questions().await?;
        Ok(questions
            .into_iter()
            .filter(|question| question.in_category(category))
            .collect())
    }
}

/// Per-user per-question progress records.
///
/// The backing store enforces no uniqueness, so the provided
/// `upsert_progress` is the only write path services use: it queries for an
/// existing `(user, question)` record and patches it, creating one only when
/// none exists.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// All progress records of one user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_progress(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError>;

    /// The record for one `(user, question)` pair, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn find_progress(
        &self,
        user: UserId,
        question: &QuestionId,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// Insert a new record; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn create_progress(&self, record: &NewProgress) -> Result<ProgressRecord, StorageError>;

    /// Patch an existing record; `None` fields stay untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    async fn update_progress(
        &self,
        id: RecordId,
        update: &ProgressUpdate,
    ) -> Result<ProgressRecord, StorageError>;

    /// Delete one record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    async fn delete_progress(&self, id: RecordId) -> Result<(), StorageError>;

    /// Find-or-create upsert keyed by `(user, question)`.
    ///
    /// Writes are idempotent under this key, which is what makes racing an
    /// in-flight write with navigation tolerable for callers.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup or write fails.
    async fn upsert_progress(
        &self,
        user: UserId,
        question: &QuestionId,
        update: &ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, StorageError> {
        match self.find_progress(user, question).await? {
            Some(existing) => self.update_progress(existing.id, update).await,
            None => {
                let record = NewProgress {
                    user_id: user,
                    question_id: question.clone(),
                    selected_answer: update.selected_answer,
                    answered: update.answered.unwrap_or(false),
                    created_at: Some(now),
                    answered_at: update.answered_at,
                };
                self.create_progress(&record).await
            }
        }
    }

    /// Delete every progress record of one user, returning the count.
    ///
    /// The store has no bulk delete, so this walks the records one by one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on the first failing delete; earlier deletes
    /// are not rolled back.
    async fn delete_all_progress(&self, user: UserId) -> Result<usize, StorageError> {
        let records = self.list_progress(user).await?;
        let mut deleted = 0;
        for record in records {
            self.delete_progress(record.id).await?;
            deleted += 1;
        }
        Ok(deleted)
    }
}

/// Write-once exam history.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// All archived exams of one user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_exams(&self, user: UserId) -> Result<Vec<ExamRecord>, StorageError>;

    /// One archived exam by store id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    async fn get_exam(&self, id: RecordId) -> Result<ExamRecord, StorageError>;

    /// Archive a submitted exam; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn create_exam(&self, record: &NewExamRecord) -> Result<ExamRecord, StorageError>;
}

/// Volatile repository for guest sessions, tests, and prototyping.
///
/// Mirrors the record store's semantics — including its lack of uniqueness
/// enforcement — so the persisted and guest code paths behave identically.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    progress: Arc<Mutex<Vec<ProgressRecord>>>,
    exams: Arc<Mutex<Vec<ExamRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the question bank served by this repository.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn seed_questions(&self, questions: Vec<Question>) {
        *self.questions.lock().expect("question lock poisoned") = questions;
    }

    fn assign_id(&self) -> RecordId {
        RecordId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_progress(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| record.user_id == user)
            .cloned()
            .collect())
    }

    async fn find_progress(
        &self,
        user: UserId,
        question: &QuestionId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .find(|record| record.user_id == user && record.question_id == *question)
            .cloned())
    }

    async fn create_progress(&self, record: &NewProgress) -> Result<ProgressRecord, StorageError> {
        let stored = ProgressRecord {
            id: self.assign_id(),
            user_id: record.user_id,
            question_id: record.question_id.clone(),
            selected_answer: record.selected_answer,
            answered: record.answered,
            created_at: record.created_at,
            answered_at: record.answered_at,
        };
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn update_progress(
        &self,
        id: RecordId,
        update: &ProgressUpdate,
    ) -> Result<ProgressRecord, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let record = guard
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StorageError::NotFound)?;
        if let Some(answer) = update.selected_answer {
            record.selected_answer = Some(answer);
        }
        if let Some(answered) = update.answered {
            record.answered = answered;
        }
        if let Some(at) = update.answered_at {
            record.answered_at = Some(at);
        }
        Ok(record.clone())
    }

    async fn delete_progress(&self, id: RecordId) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|record| record.id != id);
        if guard.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ExamRepository for InMemoryRepository {
    async fn list_exams(&self, user: UserId) -> Result<Vec<ExamRecord>, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| record.user_id() == user)
            .cloned()
            .collect())
    }

    async fn get_exam(&self, id: RecordId) -> Result<ExamRecord, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_exam(&self, record: &NewExamRecord) -> Result<ExamRecord, StorageError> {
        let stored = ExamRecord::from_persisted(
            self.assign_id(),
            record.user_id,
            record.exam_id,
            record.timestamp,
            record.total_questions,
            record.correct_answers,
            record.details.clone(),
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(stored.clone());
        Ok(stored)
    }
}

/// Aggregates the three repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub exams: Arc<dyn ExamRepository>,
}

impl Storage {
    /// Build a volatile `Storage` for guest sessions and tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryRepository::new())
    }

    /// Build a `Storage` over an existing in-memory repository (useful when
    /// the caller wants to keep a handle for seeding).
    #[must_use]
    pub fn from_memory(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let exams: Arc<dyn ExamRepository> = Arc::new(repo);
        Self {
            questions,
            progress,
            exams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryRepository>();
    }
}
