//! Shared error types for the services crate.

use thiserror::Error;

use storage::http::HttpInitError;
use storage::repository::StorageError;
use theory_core::model::{ExamRecordError, QuestionId};

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("question {0} is already revealed")]
    AlreadyRevealed(QuestionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by exam sessions and `ExamService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("question bank is empty")]
    EmptyBank,
    #[error("exam session is already submitted")]
    AlreadySubmitted,
    #[error("question {0} is not part of this exam")]
    UnknownQuestion(QuestionId),
    #[error(transparent)]
    Record(#[from] ExamRecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Http(#[from] HttpInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
