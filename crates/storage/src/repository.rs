use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ielts_core::model::{ModuleKind, QuestionSet, SessionResult, TestId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("not signed in")]
    Unauthorized,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Dashboard row for a previously submitted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub test_id: TestId,
    pub module: ModuleKind,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(alias = "band")]
    pub score: f32,
    pub completed_at: DateTime<Utc>,
}

impl ResultSummary {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            test_id: result.test_id().clone(),
            module: result.module(),
            total_questions: result.total(),
            correct_answers: result.correct(),
            score: result.band(),
            completed_at: result.completed_at(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

/// The signed-in account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Source of question material.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch the question set of one test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the test does not exist,
    /// `StorageError::InvalidPayload` for malformed or empty data, or
    /// transport errors.
    async fn fetch_question_set(
        &self,
        module: ModuleKind,
        test_id: &TestId,
    ) -> Result<QuestionSet, StorageError>;
}

/// Remote results API.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Persist a finished session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend rejects or cannot be reached.
    async fn submit_result(&self, result: &SessionResult) -> Result<(), StorageError>;

    /// Most recent results of the signed-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or decoding failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<ResultSummary>, StorageError>;
}

/// Cookie-backed account endpoints.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// The current user, or `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or decoding failures.
    async fn current_user(&self) -> Result<Option<UserProfile>, StorageError>;

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport failures.
    async fn logout(&self) -> Result<(), StorageError>;
}

/// In-memory backend for tests and offline demos.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    question_sets: Arc<Mutex<HashMap<(ModuleKind, TestId), QuestionSet>>>,
    results: Arc<Mutex<Vec<SessionResult>>>,
    user: Arc<Mutex<Option<UserProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a question set available under its module and test id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_question_set(&self, set: QuestionSet) -> Result<(), StorageError> {
        let mut guard = self
            .question_sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((set.module(), set.test_id().clone()), set);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn sign_in(&self, user: UserProfile) -> Result<(), StorageError> {
        let mut guard = self
            .user
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(user);
        Ok(())
    }

    /// Every result received so far, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn submitted(&self) -> Result<Vec<SessionResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn fetch_question_set(
        &self,
        module: ModuleKind,
        test_id: &TestId,
    ) -> Result<QuestionSet, StorageError> {
        let guard = self
            .question_sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&(module, test_id.clone()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn submit_result(&self, result: &SessionResult) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(result.clone());
        Ok(())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultSummary>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard
            .iter()
            .rev()
            .take(limit)
            .map(ResultSummary::from_result)
            .collect())
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn current_user(&self) -> Result<Option<UserProfile>, StorageError> {
        let guard = self
            .user
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn logout(&self) -> Result<(), StorageError> {
        let mut guard = self
            .user
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates backend repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// Share one in-memory backend across all repositories.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo);
        Self {
            questions,
            results,
            accounts,
        }
    }
}
