use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("exam question count must be > 0")]
    InvalidQuestionCount,

    #[error("exam duration must be > 0")]
    InvalidDuration,

    #[error("pass threshold must be in [0, 100]")]
    InvalidPassThreshold,

    #[error("trend window must be > 0")]
    InvalidTrendWindow,

    #[error("wrong-ratio threshold must be in (0, 1]")]
    InvalidWrongRatio,
}

/// Shape of a timed trial exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSettings {
    question_count: u32,
    duration_secs: u32,
}

impl ExamSettings {
    /// The official trial format: 25 questions in 19 minutes.
    #[must_use]
    pub fn official() -> Self {
        Self {
            question_count: 25,
            duration_secs: 19 * 60,
        }
    }

    /// Creates custom exam settings.
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is zero.
    pub fn new(question_count: u32, duration_secs: u32) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        if duration_secs == 0 {
            return Err(SettingsError::InvalidDuration);
        }
        Ok(Self {
            question_count,
            duration_secs,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::seconds(i64::from(self.duration_secs))
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self::official()
    }
}

/// Thresholds used by the statistics aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSettings {
    pass_threshold_percent: f64,
    trend_window: usize,
    trend_band_percent: f64,
    wrong_ratio_threshold: f64,
}

impl StatsSettings {
    /// Creates custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is out of its valid range.
    pub fn new(
        pass_threshold_percent: f64,
        trend_window: usize,
        trend_band_percent: f64,
        wrong_ratio_threshold: f64,
    ) -> Result<Self, SettingsError> {
        if !(0.0..=100.0).contains(&pass_threshold_percent) {
            return Err(SettingsError::InvalidPassThreshold);
        }
        if trend_window == 0 {
            return Err(SettingsError::InvalidTrendWindow);
        }
        if !(wrong_ratio_threshold > 0.0 && wrong_ratio_threshold <= 1.0) {
            return Err(SettingsError::InvalidWrongRatio);
        }
        Ok(Self {
            pass_threshold_percent,
            trend_window,
            trend_band_percent,
            wrong_ratio_threshold,
        })
    }

    /// A pass is a score of at least this percent.
    #[must_use]
    pub fn pass_threshold_percent(&self) -> f64 {
        self.pass_threshold_percent
    }

    /// Number of most-recent exams compared against the preceding window
    /// when classifying the trend.
    #[must_use]
    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    /// Mean-score difference (in percent points) below which the trend
    /// reads as stable.
    #[must_use]
    pub fn trend_band_percent(&self) -> f64 {
        self.trend_band_percent
    }

    /// Minimum historical wrong ratio for the frequently-wrong feed.
    #[must_use]
    pub fn wrong_ratio_threshold(&self) -> f64 {
        self.wrong_ratio_threshold
    }
}

impl Default for StatsSettings {
    /// Pass at 80%, trend over the last 3 vs the prior 3 exams with a
    /// ±5-point band, frequently-wrong at a 50% wrong ratio.
    fn default() -> Self {
        Self {
            pass_threshold_percent: 80.0,
            trend_window: 3,
            trend_band_percent: 5.0,
            wrong_ratio_threshold: 0.5,
        }
    }
}
