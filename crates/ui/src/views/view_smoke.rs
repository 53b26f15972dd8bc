use ielts_core::model::{
    AnswerOption, ModuleDescriptor, ModuleKind, Question, QuestionGroup, QuestionId, QuestionSet,
    TestId, UserId,
};
use ielts_core::time::fixed_now;
use services::{AssessmentSession, QuestionOrigin, fallback};
use storage::repository::{InMemoryRepository, ResultRepository, UserProfile, UserRole};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_repo};
use crate::vm::SessionIntent;

fn session_view(module: &str, test_id: &str) -> ViewKind {
    ViewKind::Session {
        module: module.to_string(),
        test_id: test_id.to_string(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_every_module() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.rebuild();
    let html = harness.render();
    for title in ["Listening", "Reading", "Writing", "Speaking", "Practice Test"] {
        assert!(html.contains(title), "missing {title} in {html}");
    }
    assert!(html.contains("60 minutes"), "missing duration in {html}");
}

/// A one-minute practice quiz with two questions.
fn one_minute_quiz() -> InMemoryRepository {
    let choice = |id: &str| {
        Question::choice(
            QuestionId::new(id),
            "Pick one",
            vec![AnswerOption::new("a", "A"), AnswerOption::new("b", "B")],
            "a",
        )
    };
    let set = QuestionSet::new(
        ModuleKind::Generic,
        TestId::new("quiz"),
        "Quick quiz",
        Some(1),
        vec![QuestionGroup::new("Questions", vec![choice("1"), choice("2")])],
    )
    .unwrap();
    let repo = InMemoryRepository::new();
    repo.insert_question_set(set).unwrap();
    repo
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_falls_back_to_sample_reading() {
    let mut harness = setup_view_harness(session_view("reading", "missing"));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("6 questions"), "missing question count in {html}");
    assert!(html.contains("Time allowed: 60:00"), "missing duration in {html}");
    assert!(html.contains("sample questions"), "missing notice in {html}");
    assert!(html.contains("Start test"), "missing start button in {html}");
    assert!(!html.contains("The language of bees"), "passage shown early in {html}");

    harness.send(SessionIntent::Start).await;
    let html = harness.render();
    assert!(html.contains("Passage 1"), "missing group label in {html}");
    assert!(html.contains("The language of bees"), "missing passage in {html}");
    assert!(html.contains("sample questions"), "missing notice in {html}");
    assert!(html.contains("60:00"), "missing timer in {html}");
    assert!(html.contains("0 of 6 answered"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn session_view_smoke_clock_waits_for_start() {
    let mut harness =
        setup_view_harness_with_repo(session_view("generic", "quiz"), one_minute_quiz());
    harness.settle().await;
    assert!(harness.render().contains("Time allowed: 01:00"));

    harness.advance_secs(3).await;
    let html = harness.render();
    assert!(html.contains("Start test"), "left the start panel in {html}");
    assert!(html.contains("Time allowed: 01:00"), "clock moved in {html}");
    assert!(harness.repo.submitted().unwrap().is_empty());

    harness.send(SessionIntent::Start).await;
    assert!(harness.render().contains("0 of 2 answered"));
    harness.advance_secs(2).await;
    let html = harness.render();
    assert!(
        html.contains("00:59") || html.contains("00:58"),
        "clock not running in {html}"
    );
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn session_view_smoke_expiry_submits_once_and_retry_restarts() {
    let mut harness =
        setup_view_harness_with_repo(session_view("generic", "quiz"), one_minute_quiz());
    harness.settle().await;
    harness.send(SessionIntent::Start).await;
    assert!(harness.is_ticking());

    let mut steps = 0;
    while !harness.render().contains("Quick quiz: submitted") {
        assert!(steps < 120, "never expired: {}", harness.render());
        harness.advance_secs(1).await;
        steps += 1;
    }
    assert!(steps >= 59, "expired after {steps} seconds");
    for _ in 0..4 {
        harness.drive_async().await;
    }
    assert_eq!(harness.repo.submitted().unwrap().len(), 1);
    assert!(!harness.is_ticking());

    harness.advance_secs(5).await;
    assert_eq!(harness.repo.submitted().unwrap().len(), 1);

    harness.retry_session().await;
    let html = harness.render();
    assert!(html.contains("Start test"), "retry did not reset in {html}");
    assert!(html.contains("Time allowed: 01:00"), "stale clock in {html}");
    assert!(harness.is_ticking());

    harness.send(SessionIntent::Start).await;
    harness.advance_secs(2).await;
    harness.send(SessionIntent::Submit).await;
    for _ in 0..4 {
        harness.drive_async().await;
    }
    assert!(harness.render().contains("Quick quiz: submitted"));
    assert!(!harness.is_ticking());
    assert_eq!(harness.repo.submitted().unwrap().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_rejects_unknown_module() {
    let mut harness = setup_view_harness(session_view("cooking", "1"));
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("This test module does not exist."),
        "missing error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No results yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_result_card() {
    let repo = InMemoryRepository::new();
    let set = fallback::sample_set(ModuleKind::Generic, &TestId::new("g"));
    let mut session = AssessmentSession::new(
        ModuleDescriptor::for_kind(ModuleKind::Generic),
        set,
        QuestionOrigin::Fallback,
    );
    session.start(fixed_now()).unwrap();
    let result = session.submit(fixed_now()).expect("first submit");
    repo.submit_result(&result).await.unwrap();

    let mut harness = setup_view_harness_with_repo(ViewKind::History, repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Practice Test"), "missing module in {html}");
    assert!(html.contains("Band 0.0"), "missing band in {html}");
    assert!(html.contains("0 / 10"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn account_panel_smoke_shows_signed_in_user() {
    let repo = InMemoryRepository::new();
    repo.sign_in(UserProfile {
        id: UserId::new("u1"),
        name: "Ana".into(),
        email: String::new(),
        role: UserRole::Student,
    })
    .unwrap();

    let mut harness = setup_view_harness_with_repo(ViewKind::Account, repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Signed in as Ana"), "missing user in {html}");
    assert!(html.contains("Sign out"), "missing button in {html}");
}
