use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{QuestionId, TestId};
use crate::model::module::ModuleKind;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set has no groups")]
    NoGroups,

    #[error("group {index} has no questions")]
    EmptyGroup { index: usize },

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: String,
    pub text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
    correct_answer: Option<String>,
    min_words: Option<u32>,
}

impl Question {
    /// A choice question with a single correct option key.
    #[must_use]
    pub fn choice(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            options,
            correct_answer: Some(correct_answer.into()),
            min_words: None,
        }
    }

    /// A free-text question that is not machine-scored.
    #[must_use]
    pub fn open(id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            options: Vec::new(),
            correct_answer: None,
            min_words: None,
        }
    }

    /// A writing task with a minimum word count.
    #[must_use]
    pub fn essay(id: QuestionId, text: impl Into<String>, min_words: u32) -> Self {
        Self {
            min_words: Some(min_words),
            ..Self::open(id, text)
        }
    }

    /// Rehydrate a question from any source.
    #[must_use]
    pub fn from_parts(
        id: QuestionId,
        text: String,
        options: Vec<AnswerOption>,
        correct_answer: Option<String>,
        min_words: Option<u32>,
    ) -> Self {
        Self {
            id,
            text,
            options,
            correct_answer,
            min_words,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    #[must_use]
    pub fn min_words(&self) -> Option<u32> {
        self.min_words
    }

    #[must_use]
    pub fn is_auto_scored(&self) -> bool {
        self.correct_answer.is_some()
    }
}

//
// ─── GROUPS ────────────────────────────────────────────────────────────────────
//

/// Auxiliary material attached to a section, passage or part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupContent {
    Audio { url: String },
    Passage { title: String, body: String },
    CueCard { topic: String, prompts: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub label: Option<String>,
    pub content: Option<GroupContent>,
    pub questions: Vec<Question>,
}

impl QuestionGroup {
    #[must_use]
    pub fn new(label: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            label: Some(label.into()),
            content: None,
            questions,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: GroupContent) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Read-only question material for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    module: ModuleKind,
    test_id: TestId,
    title: String,
    duration_minutes: Option<u32>,
    groups: Vec<QuestionGroup>,
}

impl QuestionSet {
    /// Build a validated question set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::NoGroups` when `groups` is empty,
    /// `QuestionSetError::EmptyGroup` when any group has no questions and
    /// `QuestionSetError::DuplicateQuestion` when a question id repeats.
    pub fn new(
        module: ModuleKind,
        test_id: TestId,
        title: impl Into<String>,
        duration_minutes: Option<u32>,
        groups: Vec<QuestionGroup>,
    ) -> Result<Self, QuestionSetError> {
        if groups.is_empty() {
            return Err(QuestionSetError::NoGroups);
        }
        let mut seen = HashSet::new();
        for (index, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(QuestionSetError::EmptyGroup { index });
            }
            for question in &group.questions {
                if !seen.insert(question.id().clone()) {
                    return Err(QuestionSetError::DuplicateQuestion(question.id().clone()));
                }
            }
        }

        Ok(Self {
            module,
            test_id,
            title: title.into(),
            duration_minutes,
            groups,
        })
    }

    /// Smallest valid set: one group holding one open question.
    #[must_use]
    pub fn placeholder(module: ModuleKind, test_id: TestId) -> Self {
        Self {
            module,
            title: format!("{} practice", module.title()),
            test_id,
            duration_minutes: None,
            groups: vec![QuestionGroup::new(
                "Practice",
                vec![Question::open(
                    QuestionId::new("practice-1"),
                    "Write down what you would like to practise today.",
                )],
            )],
        }
    }

    #[must_use]
    pub fn module(&self) -> ModuleKind {
        self.module
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    #[must_use]
    pub fn groups(&self) -> &[QuestionGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(QuestionGroup::len).collect()
    }

    /// Sum of question counts across all groups.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.groups.iter().map(QuestionGroup::len).sum()
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.groups.iter().flat_map(|group| group.questions.iter())
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.questions().any(|question| question.id() == id)
    }

    #[must_use]
    pub fn question_at(&self, group: usize, question: usize) -> Option<&Question> {
        self.groups.get(group)?.questions.get(question)
    }
}
