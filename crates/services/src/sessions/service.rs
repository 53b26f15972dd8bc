use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use ielts_core::countdown::{Countdown, Tick};
use ielts_core::model::{
    AnswerRecord, AnswerStore, ModuleDescriptor, Question, QuestionGroup, QuestionId,
    QuestionSet, SessionResult,
};
use ielts_core::navigation::{Cursor, Navigator};
use ielts_core::scoring;

use super::progress::{SessionPhase, SessionProgress};
use crate::error::SessionError;
use crate::question_source::QuestionOrigin;

/// Why a session was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Expired,
}

impl fmt::Display for SubmitTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmitTrigger::Manual => "manual",
            SubmitTrigger::Expired => "expired",
        })
    }
}

/// Result of advancing the session clock by one second.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The session is not running.
    Idle,
    Running { remaining_secs: u32 },
    /// Time ran out on this tick and the session was submitted.
    Submitted(SessionResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed attempt at a practice test.
///
/// Owns the question set, answers, navigation cursor and countdown. The
/// countdown runs exactly while the session is in progress, and the result is
/// produced once, on the transition to `Submitted`.
pub struct AssessmentSession {
    id: Uuid,
    descriptor: ModuleDescriptor,
    set: QuestionSet,
    origin: QuestionOrigin,
    answers: AnswerStore,
    navigator: Navigator,
    countdown: Countdown,
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
    result: Option<SessionResult>,
}

impl AssessmentSession {
    #[must_use]
    pub fn new(descriptor: ModuleDescriptor, set: QuestionSet, origin: QuestionOrigin) -> Self {
        let answers = AnswerStore::for_questions(&set);
        let navigator = Navigator::new(descriptor.topology(), set.group_sizes());
        let countdown = Countdown::new(
            descriptor.duration_secs(),
            descriptor.low_time_threshold_secs(),
        );
        Self {
            id: Uuid::new_v4(),
            descriptor,
            set,
            origin,
            answers,
            navigator,
            countdown,
            phase: SessionPhase::NotStarted,
            started_at: None,
            result: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn question_set(&self) -> &QuestionSet {
        &self.set
    }

    #[must_use]
    pub fn origin(&self) -> QuestionOrigin {
        self.origin
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.phase == SessionPhase::InProgress
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The result, once submitted.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.navigator.cursor()
    }

    #[must_use]
    pub fn current_group(&self) -> Option<&QuestionGroup> {
        self.set.groups().get(self.navigator.cursor().group)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let Cursor { group, question } = self.navigator.cursor();
        self.set.question_at(group, question)
    }

    /// Zero-based position in the flattened question order.
    #[must_use]
    pub fn position(&self) -> usize {
        self.navigator.flat_index()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.navigator.is_first()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.navigator.is_last()
    }

    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&str> {
        self.answers.get(id)
    }

    /// Whether `id` holds a non-blank answer.
    #[must_use]
    pub fn is_answered(&self, id: &QuestionId) -> bool {
        self.answers.is_answered(id)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        self.answers.record()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            phase: self.phase,
            total: self.set.total_questions(),
            answered: self.answers.answered(),
            remaining_secs: self.countdown.remaining(),
            is_low_time: self.countdown.is_low_time(),
        }
    }

    /// Begin the attempt and start the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        self.countdown.start();
        self.phase = SessionPhase::InProgress;
        self.started_at = Some(now);
        Ok(())
    }

    /// Record an answer. Later answers for the same question replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside of `InProgress` and
    /// `SessionError::Answer` for ids that are not part of the set.
    pub fn set_answer(
        &mut self,
        id: &QuestionId,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if !self.is_in_progress() {
            return Err(SessionError::NotInProgress);
        }
        self.answers.set(id, value)?;
        Ok(())
    }

    pub fn next(&mut self) -> bool {
        self.is_in_progress() && self.navigator.next()
    }

    pub fn prev(&mut self) -> bool {
        self.is_in_progress() && self.navigator.prev()
    }

    pub fn jump_to(&mut self, group: usize, question: usize) -> bool {
        self.is_in_progress() && self.navigator.jump_to(group, question)
    }

    pub fn jump_to_index(&mut self, index: usize) -> bool {
        self.is_in_progress() && self.navigator.jump_to_index(index)
    }

    /// Advance the countdown by one second, submitting when it reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.is_in_progress() {
            return TickOutcome::Idle;
        }
        match self.countdown.tick() {
            Tick::Idle => TickOutcome::Idle,
            Tick::Running { remaining } => TickOutcome::Running {
                remaining_secs: remaining,
            },
            Tick::Expired => self
                .finish(now)
                .map_or(TickOutcome::Idle, TickOutcome::Submitted),
        }
    }

    /// Submit the attempt. Returns the result only on the first call while in
    /// progress; any later call is a no-op.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<SessionResult> {
        self.finish(now)
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Option<SessionResult> {
        if !self.is_in_progress() {
            return None;
        }
        self.countdown.stop();
        self.phase = SessionPhase::Submitted;

        let record = self.answers.record().clone();
        let breakdown = scoring::score(self.descriptor.scoring(), &self.set, &record);
        let result = SessionResult::new(
            self.id,
            self.set.test_id().clone(),
            self.descriptor.kind(),
            breakdown,
            record,
            now,
        );
        self.result = Some(result.clone());
        Some(result)
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("id", &self.id)
            .field("module", &self.descriptor.kind())
            .field("test_id", self.set.test_id())
            .field("phase", &self.phase)
            .field("cursor", &self.navigator.cursor())
            .field("answered", &self.answers.answered())
            .field("remaining_secs", &self.countdown.remaining())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ielts_core::model::{AnswerOption, ModuleKind, TestId};
    use ielts_core::time::fixed_now;

    fn choice(id: &str, correct: &str) -> Question {
        Question::choice(
            QuestionId::new(id),
            "?",
            vec![AnswerOption::new("a", "A"), AnswerOption::new("b", "B")],
            correct,
        )
    }

    fn listening_session(duration_secs: u32) -> AssessmentSession {
        let set = QuestionSet::new(
            ModuleKind::Listening,
            TestId::new("l1"),
            "Listening",
            None,
            vec![
                QuestionGroup::new("Section 1", vec![choice("1", "a"), choice("2", "b")]),
                QuestionGroup::new("Section 2", vec![choice("3", "a"), choice("4", "b")]),
            ],
        )
        .unwrap();
        let descriptor =
            ModuleDescriptor::for_kind(ModuleKind::Listening).with_duration_secs(duration_secs);
        AssessmentSession::new(descriptor, set, QuestionOrigin::Remote)
    }

    #[test]
    fn starts_once() {
        let mut session = listening_session(60);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        session.start(fixed_now()).unwrap();
        assert!(session.is_in_progress());
        assert_eq!(session.start(fixed_now()), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn answers_require_a_running_session() {
        let mut session = listening_session(60);
        let q1 = QuestionId::new("1");
        assert_eq!(session.set_answer(&q1, "a"), Err(SessionError::NotInProgress));

        session.start(fixed_now()).unwrap();
        session.set_answer(&q1, "b").unwrap();
        session.set_answer(&q1, "a").unwrap();
        assert_eq!(session.answer(&q1), Some("a"));
        assert!(matches!(
            session.set_answer(&QuestionId::new("99"), "a"),
            Err(SessionError::Answer(_))
        ));
        assert_eq!(session.progress().answered, 1);
    }

    #[test]
    fn clearing_an_answer_takes_it_out_of_progress() {
        let mut session = listening_session(60);
        session.start(fixed_now()).unwrap();
        let q2 = QuestionId::new("2");
        session.set_answer(&q2, "b").unwrap();
        assert!(session.is_answered(&q2));
        session.set_answer(&q2, "").unwrap();

        assert!(!session.is_answered(&q2));
        assert_eq!(session.answer(&q2), Some(""));
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.progress().unanswered(), 4);
    }

    #[test]
    fn navigation_is_inert_before_start() {
        let mut session = listening_session(60);
        assert!(!session.next());
        session.start(fixed_now()).unwrap();
        assert!(session.jump_to(1, 0));
        assert!(session.prev());
        assert_eq!(session.cursor(), Cursor::new(0, 1));
        assert_eq!(session.current_question().map(|q| q.id().as_str()), Some("2"));
    }

    #[test]
    fn manual_submit_scores_once() {
        let mut session = listening_session(60);
        session.start(fixed_now()).unwrap();
        session.set_answer(&QuestionId::new("1"), "a").unwrap();
        session.set_answer(&QuestionId::new("2"), "a").unwrap();
        session.set_answer(&QuestionId::new("3"), "a").unwrap();
        session.set_answer(&QuestionId::new("4"), "a").unwrap();

        let result = session.submit(fixed_now()).unwrap();
        assert_eq!(result.correct(), 2);
        assert_eq!(result.total(), 4);
        assert!((result.band() - 4.5).abs() < f32::EPSILON);
        assert_eq!(result.session_id(), session.id());

        assert!(session.submit(fixed_now()).is_none());
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert_eq!(session.set_answer(&QuestionId::new("1"), "b"), Err(SessionError::NotInProgress));
        assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn expiry_submits_on_the_last_tick() {
        let mut session = listening_session(3);
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        session.start(fixed_now()).unwrap();
        assert_eq!(session.tick(fixed_now()), TickOutcome::Running { remaining_secs: 2 });
        assert_eq!(session.tick(fixed_now()), TickOutcome::Running { remaining_secs: 1 });

        let TickOutcome::Submitted(result) = session.tick(fixed_now()) else {
            panic!("expected auto-submit");
        };
        assert_eq!(result.correct(), 0);
        assert_eq!(result.total(), 4);
        assert!(session.is_submitted());
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert!(session.submit(fixed_now()).is_none());
    }

    #[test]
    fn low_time_is_reported_in_progress() {
        let descriptor = ModuleDescriptor::for_kind(ModuleKind::Listening)
            .with_duration_secs(10)
            .with_low_time_threshold_secs(9);
        let set = listening_session(10).question_set().clone();
        let mut session = AssessmentSession::new(descriptor, set, QuestionOrigin::Fallback);
        session.start(fixed_now()).unwrap();
        assert!(!session.progress().is_low_time);
        session.tick(fixed_now());
        let progress = session.progress();
        assert!(progress.is_low_time);
        assert_eq!(progress.remaining_secs, 9);
        assert_eq!(progress.unanswered(), 4);
    }
}
