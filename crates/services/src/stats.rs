use std::sync::Arc;

use storage::repository::{ExamRepository, ProgressRepository, QuestionRepository};
use theory_core::Clock;
use theory_core::model::{Question, StatsSettings, UserId};
use theory_core::stats::{
    CategoryStat, ExamStats, ImprovementStats, OverallStat, StreakStats, aggregate_all,
    exam_stats, frequently_wrong, improvement_stats, overall, question_attempt_stats,
    streak_stats,
};

use crate::error::StatsError;

/// Everything the statistics screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub overall: OverallStat,
    pub categories: Vec<CategoryStat>,
    pub exams: ExamStats,
    pub improvement: ImprovementStats,
    pub streaks: StreakStats,
}

/// Derives statistics views from the raw record lists.
///
/// Fetches the three collections and hands them to the pure aggregations in
/// `theory_core::stats`; nothing is cached between calls.
#[derive(Clone)]
pub struct StatisticsService {
    clock: Clock,
    settings: StatsSettings,
    questions: Arc<dyn QuestionRepository>,
    progress: Arc<dyn ProgressRepository>,
    exams: Arc<dyn ExamRepository>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        progress: Arc<dyn ProgressRepository>,
        exams: Arc<dyn ExamRepository>,
    ) -> Self {
        Self {
            clock,
            settings: StatsSettings::default(),
            questions,
            progress,
            exams,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: StatsSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The full statistics view for one user.
    ///
    /// # Errors
    ///
    /// Returns `StatsError` if any of the three collections cannot be read;
    /// no partial view is produced.
    pub async fn statistics(&self, user: UserId) -> Result<Statistics, StatsError> {
        let questions = self.questions.list_questions().await?;
        let progress = self.progress.list_progress(user).await?;
        let history = self.exams.list_exams(user).await?;
        let now = self.clock.now();

        let categories = aggregate_all(&questions, &progress);
        Ok(Statistics {
            overall: overall(&questions, &progress),
            exams: exam_stats(&history, &self.settings),
            improvement: improvement_stats(&questions, &progress, &categories, now),
            streaks: streak_stats(&progress, now.date_naive()),
            categories,
        })
    }

    /// Questions the user keeps getting wrong across exam history.
    ///
    /// Tallies every archived answer detail per question and keeps those at
    /// or above the configured wrong ratio, resolved against the current
    /// bank. Questions that left the bank since the exams were taken are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `StatsError` if the history or the bank cannot be read.
    pub async fn frequently_wrong_questions(
        &self,
        user: UserId,
    ) -> Result<Vec<Question>, StatsError> {
        let history = self.exams.list_exams(user).await?;
        let stats = question_attempt_stats(&history);
        let wrong = frequently_wrong(&stats, self.settings.wrong_ratio_threshold());
        if wrong.is_empty() {
            return Ok(Vec::new());
        }

        let bank = self.questions.list_questions().await?;
        Ok(bank
            .into_iter()
            .filter(|question| wrong.iter().any(|stat| stat.question_id == question.id))
            .collect())
    }
}
