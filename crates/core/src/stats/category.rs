use crate::evaluate::is_correct_selection;
use crate::model::{Category, ProgressRecord, Question};

/// Completion and accuracy of one topic. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub category: Category,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    /// `correct / answered` as a fraction; `0.0` when nothing is answered.
    pub accuracy: f64,
    /// `answered / total` as a fraction; `0.0` for an empty category.
    pub completion: f64,
}

impl CategoryStat {
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        self.completion * 100.0
    }
}

/// Aggregates one category from the raw question and progress lists.
///
/// Only revealed records count as answered, and correctness is recomputed
/// from the question's answer key — a record is never trusted to describe
/// its own correctness. Records pointing at questions outside the filtered
/// set are skipped. O(questions × progress); fine at bank scale, recomputed
/// on every view.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(
    questions: &[Question],
    progress: &[ProgressRecord],
    category: Category,
) -> CategoryStat {
    let in_category: Vec<&Question> = questions
        .iter()
        .filter(|question| question.in_category(category))
        .collect();
    let total = in_category.len();

    let mut answered = 0;
    let mut correct = 0;
    for record in progress.iter().filter(|record| record.answered) {
        let Some(question) = in_category
            .iter()
            .find(|question| question.id == record.question_id)
        else {
            continue;
        };
        answered += 1;
        if is_correct_selection(question, record.selected_answer) {
            correct += 1;
        }
    }

    let accuracy = if answered > 0 {
        correct as f64 / answered as f64
    } else {
        0.0
    };
    let completion = if total > 0 {
        answered as f64 / total as f64
    } else {
        0.0
    };

    CategoryStat {
        category,
        total,
        answered,
        correct,
        accuracy,
        completion,
    }
}

/// Aggregates every category of the fixed set, in display order.
#[must_use]
pub fn aggregate_all(questions: &[Question], progress: &[ProgressRecord]) -> Vec<CategoryStat> {
    Category::ALL
        .iter()
        .map(|&category| aggregate(questions, progress, category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerId, AnswerOption, QuestionId, RecordId, UserId};

    fn question(id: &str, categories: Vec<Category>) -> Question {
        Question {
            id: QuestionId::new(id),
            text: format!("question {id}"),
            answers: vec![
                AnswerOption {
                    id: AnswerId::new(1),
                    content: "right".to_string(),
                    correct: true,
                },
                AnswerOption {
                    id: AnswerId::new(2),
                    content: "wrong".to_string(),
                    correct: false,
                },
            ],
            categories,
            compulsory: false,
            image_url: None,
        }
    }

    fn record(question: &str, selected: Option<i64>, answered: bool) -> ProgressRecord {
        ProgressRecord {
            id: RecordId::new(1),
            user_id: UserId::new(7),
            question_id: QuestionId::new(question),
            selected_answer: selected.map(AnswerId::new),
            answered,
            created_at: None,
            answered_at: None,
        }
    }

    #[test]
    fn aggregates_one_category() {
        let questions = vec![
            question("1", vec![Category::Law]),
            question("2", vec![Category::Law]),
            question("3", vec![Category::TrafficSign]),
        ];
        let progress = vec![
            record("1", Some(1), true),
            record("2", Some(2), true),
            record("3", Some(1), true),
        ];

        let stat = aggregate(&questions, &progress, Category::Law);
        assert_eq!(stat.total, 2);
        assert_eq!(stat.answered, 2);
        assert_eq!(stat.correct, 1);
        assert!((stat.accuracy - 0.5).abs() < f64::EPSILON);
        assert!((stat.completion - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrevealed_selections_do_not_count() {
        let questions = vec![question("1", vec![Category::Law])];
        let progress = vec![record("1", Some(1), false)];

        let stat = aggregate(&questions, &progress, Category::Law);
        assert_eq!(stat.answered, 0);
        assert_eq!(stat.correct, 0);
        assert_eq!(stat.accuracy, 0.0);
    }

    #[test]
    fn revealed_blank_counts_as_incorrect() {
        let questions = vec![question("1", vec![Category::Situation])];
        let progress = vec![record("1", None, true)];

        let stat = aggregate(&questions, &progress, Category::Situation);
        assert_eq!(stat.answered, 1);
        assert_eq!(stat.correct, 0);
    }

    #[test]
    fn multi_category_questions_count_once_per_category() {
        let questions = vec![
            question("1", vec![Category::Law, Category::Situation]),
            question("2", vec![Category::Law]),
        ];

        let stats = aggregate_all(&questions, &[]);
        let total: usize = stats.iter().map(|stat| stat.total).sum();
        // question 1 appears in two category totals
        assert_eq!(total, 3);
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[2].total, 1);
    }

    #[test]
    fn empty_category_yields_zero_rates() {
        let stat = aggregate(&[], &[], Category::TrafficSign);
        assert_eq!(stat.total, 0);
        assert_eq!(stat.completion, 0.0);
        assert_eq!(stat.accuracy, 0.0);
    }
}
