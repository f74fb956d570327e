use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId};

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Error returned when a category string is not part of the fixed topic set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

/// Fixed topic set of the driving-theory bank.
///
/// Every question belongs to at least one of these; completion and accuracy
/// are aggregated per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Traffic law questions.
    #[serde(rename = "law")]
    Law,
    /// Road sign recognition questions.
    #[serde(rename = "traffic-sign")]
    TrafficSign,
    /// Road situation (diagram) questions.
    #[serde(rename = "situation")]
    Situation,
}

impl Category {
    /// All categories, in the order the topic screens list them.
    pub const ALL: [Category; 3] = [Category::Law, Category::TrafficSign, Category::Situation];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Law => "law",
            Category::TrafficSign => "traffic-sign",
            Category::Situation => "situation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "law" => Ok(Category::Law),
            "traffic-sign" => Ok(Category::TrafficSign),
            "situation" => Ok(Category::Situation),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub content: String,
    pub correct: bool,
}

/// A question from the bank.
///
/// Questions are owned and mutated by the (out-of-scope) admin surface; the
/// core only ever reads them. Exactly one option is expected to carry
/// `correct = true`; evaluation uses the first marked option and tolerates
/// banks that violate the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub answers: Vec<AnswerOption>,
    pub categories: Vec<Category>,
    pub compulsory: bool,
    pub image_url: Option<String>,
}

impl Question {
    /// Looks up an option by id.
    #[must_use]
    pub fn option(&self, id: AnswerId) -> Option<&AnswerOption> {
        self.answers.iter().find(|option| option.id == id)
    }

    /// The first option marked correct, if any.
    #[must_use]
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.answers.iter().find(|option| option.correct)
    }

    #[must_use]
    pub fn in_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
