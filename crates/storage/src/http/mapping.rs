//! Wire shapes of the record store and their mapping onto domain types.
//!
//! The store is lenient where the domain is strict: `categories` may be a
//! single string or an array, numeric ids show up as strings in historical
//! records, and optional flags are simply absent. Everything is normalized
//! here so repositories and services only ever see domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use theory_core::model::{
    AnswerDetail, AnswerId, AnswerOption, Category, ExamId, ExamRecord, ExamRecordError,
    NewExamRecord, NewProgress, ProgressRecord, ProgressUpdate, Question, QuestionId, RecordId,
    UserId,
};

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerWire {
    pub id: AnswerId,
    pub content: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionWire {
    pub id: QuestionId,
    pub question: String,
    #[serde(default)]
    pub answer: Vec<AnswerWire>,
    #[serde(default)]
    pub categories: OneOrMany,
    #[serde(default)]
    pub compulsory: bool,
    #[serde(default)]
    pub img_url: Option<String>,
}

impl QuestionWire {
    pub(crate) fn into_question(self) -> Question {
        let categories = self
            .categories
            .into_vec()
            .into_iter()
            .filter_map(|raw| match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(_) => {
                    tracing::warn!(category = %raw, question = %self.id, "skipping unknown category");
                    None
                }
            })
            .collect();

        Question {
            id: self.id,
            text: self.question,
            answers: self
                .answer
                .into_iter()
                .map(|wire| AnswerOption {
                    id: wire.id,
                    content: wire.content,
                    correct: wire.correct,
                })
                .collect(),
            categories,
            compulsory: self.compulsory,
            image_url: self.img_url,
        }
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressWire {
    pub id: RecordId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    #[serde(default)]
    pub selected_answer: Option<AnswerId>,
    #[serde(default)]
    pub answered: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
}

impl ProgressWire {
    pub(crate) fn into_record(self) -> ProgressRecord {
        ProgressRecord {
            id: self.id,
            user_id: self.user_id,
            question_id: self.question_id,
            selected_answer: self.selected_answer,
            answered: self.answered,
            created_at: self.created_at,
            answered_at: self.answered_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewProgressWire<'a> {
    pub user_id: UserId,
    pub question_id: &'a QuestionId,
    pub selected_answer: Option<AnswerId>,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl<'a> NewProgressWire<'a> {
    pub(crate) fn from_domain(record: &'a NewProgress) -> Self {
        Self {
            user_id: record.user_id,
            question_id: &record.question_id,
            selected_answer: record.selected_answer,
            answered: record.answered,
            created_at: record.created_at,
            answered_at: record.answered_at,
        }
    }
}

/// Patch body: absent fields are left untouched by the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressPatchWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_answer: Option<AnswerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl ProgressPatchWire {
    pub(crate) fn from_domain(update: &ProgressUpdate) -> Self {
        Self {
            selected_answer: update.selected_answer,
            answered: update.answered,
            answered_at: update.answered_at,
        }
    }
}

//
// ─── EXAMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailWire {
    pub question_id: QuestionId,
    #[serde(default)]
    pub selected_answer_id: Option<AnswerId>,
    pub correct_answer_id: AnswerId,
    #[serde(default)]
    pub is_correct: bool,
}

impl DetailWire {
    fn into_detail(self) -> AnswerDetail {
        AnswerDetail {
            question_id: self.question_id,
            selected_answer_id: self.selected_answer_id,
            correct_answer_id: self.correct_answer_id,
            is_correct: self.is_correct,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamWire {
    pub id: RecordId,
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub timestamp: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub details: Vec<DetailWire>,
}

impl ExamWire {
    pub(crate) fn into_record(self) -> Result<ExamRecord, ExamRecordError> {
        ExamRecord::from_persisted(
            self.id,
            self.user_id,
            self.exam_id,
            self.timestamp,
            self.total_questions,
            self.correct_answers,
            self.details
                .into_iter()
                .map(DetailWire::into_detail)
                .collect(),
        )
    }
}

/// Outgoing detail: answer ids are written as strings, matching the shape
/// the store's historical records already carry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailOutWire {
    pub question_id: QuestionId,
    pub selected_answer_id: Option<String>,
    pub correct_answer_id: String,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewExamWire {
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub timestamp: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub details: Vec<DetailOutWire>,
}

impl NewExamWire {
    pub(crate) fn from_domain(record: &NewExamRecord) -> Self {
        Self {
            user_id: record.user_id,
            exam_id: record.exam_id,
            timestamp: record.timestamp,
            total_questions: record.total_questions,
            correct_answers: record.correct_answers,
            details: record
                .details
                .iter()
                .map(|detail| DetailOutWire {
                    question_id: detail.question_id.clone(),
                    selected_answer_id: detail.selected_answer_id.map(|id| id.to_string()),
                    correct_answer_id: detail.correct_answer_id.to_string(),
                    is_correct: detail.is_correct,
                })
                .collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_maps_array_categories() {
        let wire: QuestionWire = serde_json::from_str(
            r#"{
                "id": "12",
                "question": "What does this sign mean?",
                "answer": [
                    {"id": 1, "content": "Stop", "correct": true},
                    {"id": 2, "content": "Yield", "correct": false}
                ],
                "categories": ["traffic-sign"],
                "compulsory": true,
                "img_url": "http://example.test/sign.png"
            }"#,
        )
        .unwrap();

        let question = wire.into_question();
        assert_eq!(question.id, QuestionId::new("12"));
        assert_eq!(question.categories, vec![Category::TrafficSign]);
        assert!(question.compulsory);
        assert_eq!(question.answers.len(), 2);
        assert_eq!(question.correct_option().unwrap().id, AnswerId::new(1));
    }

    #[test]
    fn question_tolerates_single_string_category_and_missing_fields() {
        let wire: QuestionWire = serde_json::from_str(
            r#"{
                "id": 7,
                "question": "Who has right of way?",
                "answer": [{"id": "1", "content": "Me", "correct": true}],
                "categories": "situation",
                "img_url": null
            }"#,
        )
        .unwrap();

        let question = wire.into_question();
        assert_eq!(question.id, QuestionId::new("7"));
        assert_eq!(question.categories, vec![Category::Situation]);
        assert!(!question.compulsory);
        assert_eq!(question.image_url, None);
    }

    #[test]
    fn question_skips_unknown_categories() {
        let wire: QuestionWire = serde_json::from_str(
            r#"{
                "id": "1",
                "question": "Q",
                "answer": [],
                "categories": ["law", "parking"]
            }"#,
        )
        .unwrap();
        assert_eq!(wire.into_question().categories, vec![Category::Law]);
    }

    #[test]
    fn progress_defaults_absent_fields() {
        let wire: ProgressWire = serde_json::from_str(
            r#"{"id": 3, "userId": 7, "questionId": "1", "selectedAnswer": "2"}"#,
        )
        .unwrap();

        let record = wire.into_record();
        assert_eq!(record.selected_answer, Some(AnswerId::new(2)));
        assert!(!record.answered);
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn progress_patch_serializes_only_set_fields() {
        let patch = ProgressPatchWire::from_domain(&ProgressUpdate::selection(AnswerId::new(4)));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"selectedAnswer": 4}));
    }

    #[test]
    fn exam_round_trips_string_answer_ids() {
        let wire: ExamWire = serde_json::from_str(
            r#"{
                "id": 5,
                "userId": 1,
                "examId": 2,
                "timestamp": "2025-01-01T10:00:00Z",
                "totalQuestions": 2,
                "correctAnswers": 1,
                "details": [
                    {"questionId": "1", "selectedAnswerId": "2", "correctAnswerId": "1", "isCorrect": false},
                    {"questionId": 4, "correctAnswerId": 3, "isCorrect": true}
                ]
            }"#,
        )
        .unwrap();

        let record = wire.into_record().unwrap();
        assert_eq!(record.correct_answers(), 1);
        assert_eq!(record.details()[0].selected_answer_id, Some(AnswerId::new(2)));
        assert_eq!(record.details()[1].selected_answer_id, None);
        assert_eq!(record.details()[1].question_id, QuestionId::new("4"));
    }

    #[test]
    fn exam_with_misaligned_counts_is_rejected() {
        let wire: ExamWire = serde_json::from_str(
            r#"{
                "id": 5,
                "userId": 1,
                "examId": 2,
                "timestamp": "2025-01-01T10:00:00Z",
                "totalQuestions": 3,
                "correctAnswers": 1,
                "details": []
            }"#,
        )
        .unwrap();
        assert!(wire.into_record().is_err());
    }

    #[test]
    fn new_exam_writes_answer_ids_as_strings() {
        let record = NewExamRecord::from_details(
            UserId::new(1),
            ExamId::new(9),
            "2025-01-01T10:00:00Z".parse().unwrap(),
            vec![AnswerDetail {
                question_id: QuestionId::new("1"),
                selected_answer_id: Some(AnswerId::new(2)),
                correct_answer_id: AnswerId::new(1),
                is_correct: false,
            }],
        )
        .unwrap();

        let json = serde_json::to_value(NewExamWire::from_domain(&record)).unwrap();
        assert_eq!(json["details"][0]["selectedAnswerId"], "2");
        assert_eq!(json["details"][0]["correctAnswerId"], "1");
        assert_eq!(json["totalQuestions"], 1);
    }
}
