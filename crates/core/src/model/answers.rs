use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::QuestionSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),
}

/// Question id → the user's chosen option key or free text.
///
/// Last write wins; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<QuestionId, String>);

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the previous value.
    pub fn insert(&mut self, id: QuestionId, value: impl Into<String>) -> Option<String> {
        self.0.insert(id, value.into())
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.0.iter().map(|(id, value)| (id, value.as_str()))
    }
}

/// Answer record bound to the questions of one session.
///
/// Keys are restricted to the loaded question ids. Values are stored as given;
/// checking them against options is the scorer's job.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    known: HashSet<QuestionId>,
    record: AnswerRecord,
}

impl AnswerStore {
    #[must_use]
    pub fn for_questions(set: &QuestionSet) -> Self {
        Self {
            known: set.questions().map(|q| q.id().clone()).collect(),
            record: AnswerRecord::new(),
        }
    }

    /// Record an answer, overwriting any previous value for the question.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::UnknownQuestion` if the id is not in the question set.
    pub fn set(&mut self, id: &QuestionId, value: impl Into<String>) -> Result<(), AnswerError> {
        if !self.known.contains(id) {
            return Err(AnswerError::UnknownQuestion(id.clone()));
        }
        self.record.insert(id.clone(), value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.record.get(id)
    }

    /// Number of stored entries, blank ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// Whether the question holds a non-blank answer. A cleared text field
    /// leaves an empty entry behind, which does not count.
    #[must_use]
    pub fn is_answered(&self, id: &QuestionId) -> bool {
        self.get(id).is_some_and(|value| !value.trim().is_empty())
    }

    /// Number of questions with a non-blank answer.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.record
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    #[must_use]
    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }
}
