use crate::model::{ExamRecord, StatsSettings};

/// Direction of recent exam results relative to the preceding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Aggregate view of a user's exam history.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamStats {
    pub total_exams: usize,
    /// Mean percent score; `0.0` with no exams.
    pub average_score: f64,
    /// Best percent score; `0.0` with no exams.
    pub best_score: f64,
    /// Fraction of exams at or above the pass threshold.
    pub pass_rate: f64,
    pub recent_trend: Trend,
}

impl ExamStats {
    #[must_use]
    pub fn pass_rate_percent(&self) -> f64 {
        self.pass_rate * 100.0
    }
}

/// Derives exam statistics from the full history, oldest first.
///
/// Scores are normalized to percent before any comparison, so exams of
/// different sizes average sensibly.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn exam_stats(exams: &[ExamRecord], settings: &StatsSettings) -> ExamStats {
    let scores: Vec<f64> = exams.iter().map(ExamRecord::score_percent).collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    let best_score = scores.iter().copied().fold(0.0, f64::max);
    let passed = scores
        .iter()
        .filter(|&&score| score >= settings.pass_threshold_percent())
        .count();
    let pass_rate = if exams.is_empty() {
        0.0
    } else {
        passed as f64 / exams.len() as f64
    };

    ExamStats {
        total_exams: exams.len(),
        average_score,
        best_score,
        pass_rate,
        recent_trend: trend(&scores, settings),
    }
}

/// Compares the mean of the most recent window against the preceding one.
///
/// Too little history (fewer than two scores, or an empty preceding window)
/// reads as stable, as does any difference within the sensitivity band.
#[allow(clippy::cast_precision_loss)]
fn trend(scores: &[f64], settings: &StatsSettings) -> Trend {
    if scores.len() < 2 {
        return Trend::Stable;
    }
    let window = settings.trend_window();
    let recent = &scores[scores.len().saturating_sub(window)..];
    let older_end = scores.len().saturating_sub(window);
    let older_start = scores.len().saturating_sub(window * 2);
    let older = &scores[older_start..older_end];
    if recent.is_empty() || older.is_empty() {
        return Trend::Stable;
    }

    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().sum::<f64>() / older.len() as f64;

    if recent_avg > older_avg + settings.trend_band_percent() {
        Trend::Up
    } else if recent_avg < older_avg - settings.trend_band_percent() {
        Trend::Down
    } else {
        Trend::Stable
    }
}
