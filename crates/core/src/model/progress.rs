use chrono::{DateTime, NaiveDate, Utc};

use crate::model::ids::{AnswerId, QuestionId, RecordId, UserId};

//
// ─── PROGRESS STATE ────────────────────────────────────────────────────────────
//

/// Per-question lifecycle of a user's practice interaction.
///
/// `Unanswered` → `Selected` → `Revealed`. Reveal is terminal for the
/// question until the user's whole progress is bulk-reset (which deletes the
/// record and returns the question to `Unanswered`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// No record, or a record with neither a selection nor a reveal.
    Unanswered,
    /// A choice was made but correctness has not been disclosed yet.
    Selected,
    /// Correctness was disclosed; the selection is locked.
    Revealed,
}

impl ProgressState {
    #[must_use]
    pub fn is_revealed(self) -> bool {
        matches!(self, ProgressState::Revealed)
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Persisted state of one user's interaction with one question.
///
/// At most one record exists per `(user_id, question_id)` pair; the store
/// does not enforce this, so the accessor's upsert must.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub selected_answer: Option<AnswerId>,
    pub answered: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn state(&self) -> ProgressState {
        if self.answered {
            ProgressState::Revealed
        } else if self.selected_answer.is_some() {
            ProgressState::Selected
        } else {
            ProgressState::Unanswered
        }
    }

    /// UTC calendar date of the most recent activity on this record.
    ///
    /// Prefers the reveal time over the creation time; records written
    /// before timestamps existed yield `None` and are ignored by streaks.
    #[must_use]
    pub fn activity_date(&self) -> Option<NaiveDate> {
        self.answered_at
            .or(self.created_at)
            .map(|at| at.date_naive())
    }
}

/// Looks up the practice state for a question within a progress snapshot.
///
/// A question with no record is `Unanswered`.
#[must_use]
pub fn state_of(records: &[ProgressRecord], question_id: &QuestionId) -> ProgressState {
    records
        .iter()
        .find(|record| record.question_id == *question_id)
        .map_or(ProgressState::Unanswered, ProgressRecord::state)
}

//
// ─── WRITE SHAPES ──────────────────────────────────────────────────────────────
//

/// A progress record about to be created; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgress {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub selected_answer: Option<AnswerId>,
    pub answered: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl NewProgress {
    /// First selection of an answer for a question.
    #[must_use]
    pub fn selection(
        user_id: UserId,
        question_id: QuestionId,
        answer: AnswerId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            question_id,
            selected_answer: Some(answer),
            answered: false,
            created_at: Some(now),
            answered_at: None,
        }
    }

    /// Reveal requested with no prior selection; counts as answered
    /// incorrectly in every correctness computation.
    #[must_use]
    pub fn revealed_blank(user_id: UserId, question_id: QuestionId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            question_id,
            selected_answer: None,
            answered: true,
            created_at: Some(now),
            answered_at: Some(now),
        }
    }
}

/// Partial update applied to an existing progress record.
///
/// `None` fields are left untouched by the store (patch semantics). There is
/// deliberately no way to clear a selection: normal use only ever overwrites
/// it, and bulk reset deletes the record outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub selected_answer: Option<AnswerId>,
    pub answered: Option<bool>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl ProgressUpdate {
    /// Overwrite the selection, leaving the reveal flag untouched.
    #[must_use]
    pub fn selection(answer: AnswerId) -> Self {
        Self {
            selected_answer: Some(answer),
            answered: None,
            answered_at: None,
        }
    }

    /// Disclose correctness: sets `answered` and stamps the reveal time.
    #[must_use]
    pub fn reveal(now: DateTime<Utc>) -> Self {
        Self {
            selected_answer: None,
            answered: Some(true),
            answered_at: Some(now),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_answer.is_none() && self.answered.is_none() && self.answered_at.is_none()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record(selected: Option<i64>, answered: bool) -> ProgressRecord {
        ProgressRecord {
            id: RecordId::new(1),
            user_id: UserId::new(7),
            question_id: QuestionId::new("1"),
            selected_answer: selected.map(AnswerId::new),
            answered,
            created_at: Some(fixed_now()),
            answered_at: None,
        }
    }

    #[test]
    fn state_follows_lifecycle() {
        assert_eq!(record(None, false).state(), ProgressState::Unanswered);
        assert_eq!(record(Some(2), false).state(), ProgressState::Selected);
        assert_eq!(record(Some(2), true).state(), ProgressState::Revealed);
        // reveal with no prior selection is still revealed
        assert_eq!(record(None, true).state(), ProgressState::Revealed);
    }

    #[test]
    fn state_of_defaults_to_unanswered() {
        let records = vec![record(Some(2), false)];
        assert_eq!(
            state_of(&records, &QuestionId::new("1")),
            ProgressState::Selected
        );
        assert_eq!(
            state_of(&records, &QuestionId::new("other")),
            ProgressState::Unanswered
        );
    }

    #[test]
    fn activity_date_prefers_reveal_time() {
        let mut rec = record(Some(2), true);
        rec.answered_at = Some(fixed_now() + chrono::Duration::days(2));
        assert_eq!(
            rec.activity_date(),
            Some((fixed_now() + chrono::Duration::days(2)).date_naive())
        );

        rec.answered_at = None;
        assert_eq!(rec.activity_date(), Some(fixed_now().date_naive()));

        rec.created_at = None;
        assert_eq!(rec.activity_date(), None);
    }
}
