use std::sync::Arc;

use services::{Clock, StatisticsService};
use storage::repository::{ExamRepository, InMemoryRepository, ProgressRepository};
use theory_core::model::{
    AnswerDetail, AnswerId, AnswerOption, Category, ExamId, NewExamRecord, NewProgress, Question,
    QuestionId, UserId,
};
use theory_core::stats::Trend;
use theory_core::time::fixed_now;
use chrono::Duration;

fn build_question(id: u64, category: Category) -> Question {
    Question {
        id: QuestionId::new(id.to_string()),
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
        categories: vec![category],
        compulsory: false,
        image_url: None,
    }
}

async fn seed_revealed(
    repo: &InMemoryRepository,
    user: UserId,
    question: &str,
    selected: i64,
    days_ago: i64,
) {
    let at = fixed_now() - Duration::days(days_ago);
    repo.create_progress(&NewProgress {
        user_id: user,
        question_id: QuestionId::new(question),
        selected_answer: Some(AnswerId::new(selected)),
        answered: true,
        created_at: Some(at),
        answered_at: Some(at),
    })
    .await
    .unwrap();
}

async fn seed_exam(repo: &InMemoryRepository, user: UserId, results: &[(&str, bool)]) {
    let details = results
        .iter()
        .map(|&(question, is_correct)| AnswerDetail {
            question_id: QuestionId::new(question),
            selected_answer_id: Some(AnswerId::new(if is_correct { 1 } else { 2 })),
            correct_answer_id: AnswerId::new(1),
            is_correct,
        })
        .collect();
    let record =
        NewExamRecord::from_details(user, ExamId::new(1), fixed_now(), details).unwrap();
    repo.create_exam(&record).await.unwrap();
}

fn service(repo: &InMemoryRepository) -> StatisticsService {
    StatisticsService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
}

#[tokio::test]
async fn statistics_assemble_all_views() {
    let repo = InMemoryRepository::new();
    let user = UserId::new(7);
    repo.seed_questions(vec![
        build_question(1, Category::Law),
        build_question(2, Category::Law),
        build_question(3, Category::TrafficSign),
        build_question(4, Category::Situation),
    ]);

    // law: one right today, one wrong yesterday; sign untouched
    seed_revealed(&repo, user, "1", 1, 0).await;
    seed_revealed(&repo, user, "2", 2, 1).await;
    seed_revealed(&repo, user, "4", 1, 1).await;

    // two passed exams, one failed
    seed_exam(&repo, user, &[("1", true), ("2", true)]).await;
    seed_exam(&repo, user, &[("1", true), ("2", false)]).await;
    seed_exam(&repo, user, &[("1", true), ("2", true)]).await;

    let stats = service(&repo).statistics(user).await.unwrap();

    assert_eq!(stats.overall.total_questions, 4);
    assert_eq!(stats.overall.answered, 3);
    assert_eq!(stats.overall.correct, 2);

    let law = &stats.categories[0];
    assert_eq!(law.category, Category::Law);
    assert_eq!(law.total, 2);
    assert_eq!(law.answered, 2);
    assert_eq!(law.correct, 1);

    assert_eq!(stats.exams.total_exams, 3);
    assert!((stats.exams.best_score - 100.0).abs() < f64::EPSILON);
    assert!((stats.exams.pass_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.exams.recent_trend, Trend::Stable);

    // activity on the fixed day and the day before
    assert_eq!(stats.streaks.current_streak, 2);
    assert_eq!(stats.streaks.longest_streak, 2);
    assert_eq!(stats.streaks.total_study_days, 2);

    assert_eq!(stats.improvement.questions_improved, 2);
    assert_eq!(stats.improvement.weekly_progress, 3);
    assert_eq!(stats.improvement.strongest_category, Some(Category::Situation));
    assert_eq!(stats.improvement.weakest_category, Some(Category::TrafficSign));
}

#[tokio::test]
async fn statistics_for_a_fresh_user_are_all_zero() {
    let repo = InMemoryRepository::new();
    repo.seed_questions(vec![build_question(1, Category::Law)]);

    let stats = service(&repo).statistics(UserId::new(99)).await.unwrap();
    assert_eq!(stats.overall.answered, 0);
    assert_eq!(stats.exams.total_exams, 0);
    assert_eq!(stats.streaks.current_streak, 0);
    assert_eq!(stats.improvement.weekly_progress, 0);
}

#[tokio::test]
async fn frequently_wrong_resolves_against_the_bank() {
    let repo = InMemoryRepository::new();
    let user = UserId::new(7);
    repo.seed_questions(vec![
        build_question(1, Category::Law),
        build_question(2, Category::Law),
    ]);

    // question 1: wrong twice out of three; question 2: always right;
    // question 3: always wrong but no longer in the bank
    seed_exam(&repo, user, &[("1", false), ("2", true), ("3", false)]).await;
    seed_exam(&repo, user, &[("1", false), ("2", true)]).await;
    seed_exam(&repo, user, &[("1", true), ("2", true)]).await;

    let questions = service(&repo)
        .frequently_wrong_questions(user)
        .await
        .unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, QuestionId::new("1"));
}

#[tokio::test]
async fn no_exam_history_means_nothing_frequently_wrong() {
    let repo = InMemoryRepository::new();
    repo.seed_questions(vec![build_question(1, Category::Law)]);

    let questions = service(&repo)
        .frequently_wrong_questions(UserId::new(7))
        .await
        .unwrap();
    assert!(questions.is_empty());
}
