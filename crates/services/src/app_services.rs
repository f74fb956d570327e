use std::sync::Arc;

use storage::repository::Storage;
use theory_core::Clock;
use theory_core::model::{ExamSettings, StatsSettings};

use crate::error::AppServicesError;
use crate::exam::ExamService;
use crate::practice::PracticeService;
use crate::stats::StatisticsService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    practice: Arc<PracticeService>,
    exams: Arc<ExamService>,
    statistics: Arc<StatisticsService>,
    storage: Storage,
}

impl AppServices {
    /// Wire services over an already constructed storage backend.
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        let practice = Arc::new(PracticeService::new(clock, Arc::clone(&storage.progress)));
        let exams = Arc::new(ExamService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.exams),
        ));
        let statistics = Arc::new(StatisticsService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.exams),
        ));
        Self {
            practice,
            exams,
            statistics,
            storage,
        }
    }

    /// Build services backed by the HTTP record store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the store client cannot be built.
    pub fn http(clock: Clock, base_url: &str) -> Result<Self, AppServicesError> {
        Ok(Self::new(clock, Storage::http(base_url)?))
    }

    /// Build volatile guest-mode services: same semantics, no persistence,
    /// state gone when dropped.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Storage::in_memory())
    }

    /// Replace the domain tunables before handing services out.
    #[must_use]
    pub fn with_settings(mut self, exam: ExamSettings, stats: StatsSettings) -> Self {
        let exams = ExamService::clone(&self.exams).with_settings(exam);
        let statistics = StatisticsService::clone(&self.statistics).with_settings(stats);
        self.exams = Arc::new(exams);
        self.statistics = Arc::new(statistics);
        self
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamService> {
        Arc::clone(&self.exams)
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
