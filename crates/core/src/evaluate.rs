//! Answer correctness evaluation.
//!
//! Pure lookups against a question's answer key; no I/O, no failure modes.
//! An id that does not exist in the question — or no selection at all —
//! evaluates as incorrect, never as an error.

use crate::model::{AnswerId, Question};

/// Whether `selected` names the correct option of `question`.
#[must_use]
pub fn is_correct(question: &Question, selected: AnswerId) -> bool {
    question
        .option(selected)
        .is_some_and(|option| option.correct)
}

/// Like [`is_correct`], treating a missing selection as incorrect.
///
/// This is the form every correctness computation uses: revealed-but-blank
/// progress records and unanswered exam questions both score as wrong.
#[must_use]
pub fn is_correct_selection(question: &Question, selected: Option<AnswerId>) -> bool {
    selected.is_some_and(|id| is_correct(question, id))
}
