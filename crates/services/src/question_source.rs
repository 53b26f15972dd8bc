use std::sync::Arc;

use ielts_core::model::{ModuleKind, QuestionSet, TestId};
use storage::repository::QuestionRepository;
use tracing::{info, warn};

use crate::fallback;

/// Where a session's questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrigin {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuestions {
    pub set: QuestionSet,
    pub origin: QuestionOrigin,
}

/// Fetches question sets, substituting built-in samples on any failure.
#[derive(Clone)]
pub struct QuestionSource {
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Load the question set for one test. Never fails.
    pub async fn load(&self, module: ModuleKind, test_id: &TestId) -> LoadedQuestions {
        match self.questions.fetch_question_set(module, test_id).await {
            Ok(set) => {
                info!(%module, %test_id, questions = set.total_questions(), "question set loaded");
                LoadedQuestions {
                    set,
                    origin: QuestionOrigin::Remote,
                }
            }
            Err(err) => {
                warn!(%module, %test_id, %err, "question set unavailable, using sample questions");
                LoadedQuestions {
                    set: fallback::sample_set(module, test_id),
                    origin: QuestionOrigin::Fallback,
                }
            }
        }
    }
}
