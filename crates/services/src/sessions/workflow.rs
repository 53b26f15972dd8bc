use std::sync::Arc;

use ielts_core::model::{ModuleDescriptor, ModuleKind, SessionResult, TestId};
use storage::repository::{QuestionRepository, ResultRepository};
use tokio::task::JoinHandle;
use tracing::info;

use super::service::{AssessmentSession, SubmitTrigger, TickOutcome};
use crate::Clock;
use crate::error::SessionError;
use crate::question_source::{LoadedQuestions, QuestionSource};
use crate::result_submitter::{ResultSubmitter, SubmitOutcome};

/// A freshly produced result and its in-flight delivery.
///
/// Dropping `delivery` detaches the task; delivery still completes.
#[derive(Debug)]
pub struct Submission {
    pub result: SessionResult,
    pub delivery: JoinHandle<SubmitOutcome>,
}

/// Orchestrates session preparation, clock ticks and result delivery.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    source: QuestionSource,
    submitter: ResultSubmitter,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            source: QuestionSource::new(questions),
            submitter: ResultSubmitter::new(results),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn submitter(&self) -> &ResultSubmitter {
        &self.submitter
    }

    /// Load questions and build a session that has not started yet.
    ///
    /// Never fails: unavailable tests are replaced by sample questions.
    pub async fn prepare(&self, module: ModuleKind, test_id: &TestId) -> AssessmentSession {
        let LoadedQuestions { set, origin } = self.source.load(module, test_id).await;
        let descriptor = match (module, set.duration_minutes()) {
            (ModuleKind::Generic, Some(minutes)) => {
                ModuleDescriptor::for_kind(module).with_duration_secs(minutes.saturating_mul(60))
            }
            _ => ModuleDescriptor::for_kind(module),
        };
        AssessmentSession::new(descriptor, set, origin)
    }

    /// Prepare and immediately start a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the new session refuses to start.
    pub async fn open(
        &self,
        module: ModuleKind,
        test_id: &TestId,
    ) -> Result<AssessmentSession, SessionError> {
        let mut session = self.prepare(module, test_id).await;
        self.start(&mut session)?;
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` if the session was started before.
    pub fn start(&self, session: &mut AssessmentSession) -> Result<(), SessionError> {
        session.start(self.clock.now())?;
        info!(
            session = %session.id(),
            module = %session.descriptor().kind(),
            test_id = %session.question_set().test_id(),
            duration_secs = session.descriptor().duration_secs(),
            "session started"
        );
        Ok(())
    }

    /// Advance the clock by one second; on expiry, dispatch the result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn tick(&self, session: &mut AssessmentSession) -> Option<Submission> {
        match session.tick(self.clock.now()) {
            TickOutcome::Submitted(result) => Some(self.deliver(result, SubmitTrigger::Expired)),
            TickOutcome::Idle | TickOutcome::Running { .. } => None,
        }
    }

    /// Submit manually. Only the first call produces a submission.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, session: &mut AssessmentSession) -> Option<Submission> {
        let result = session.submit(self.clock.now())?;
        Some(self.deliver(result, SubmitTrigger::Manual))
    }

    fn deliver(&self, result: SessionResult, trigger: SubmitTrigger) -> Submission {
        info!(
            session = %result.session_id(),
            %trigger,
            correct = result.correct(),
            total = result.total(),
            band = result.band(),
            "session submitted"
        );
        let delivery = self.submitter.dispatch(result.clone());
        Submission { result, delivery }
    }
}
