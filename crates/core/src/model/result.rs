use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::answers::AnswerRecord;
use crate::model::ids::TestId;
use crate::model::module::ModuleKind;
use crate::scoring::{ScoreBreakdown, TaskBand};

/// Outcome of one finished session.
///
/// Created once when the session is submitted; there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    session_id: Uuid,
    test_id: TestId,
    module: ModuleKind,
    total_questions: u32,
    correct_answers: u32,
    score: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    task_scores: Vec<TaskBand>,
    answers: AnswerRecord,
    completed_at: DateTime<Utc>,
}

impl SessionResult {
    #[must_use]
    pub fn new(
        session_id: Uuid,
        test_id: TestId,
        module: ModuleKind,
        breakdown: ScoreBreakdown,
        answers: AnswerRecord,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            test_id,
            module,
            total_questions: breakdown.total,
            correct_answers: breakdown.correct,
            score: breakdown.band,
            task_scores: breakdown.tasks,
            answers,
            completed_at,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn module(&self) -> ModuleKind {
        self.module
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct_answers
    }

    /// Normalized band in `[0, 9]`.
    #[must_use]
    pub fn band(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn task_scores(&self) -> &[TaskBand] {
        &self.task_scores
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
