use std::sync::Arc;

use storage::repository::{ResultRepository, ResultSummary, StorageError};

use crate::error::HistoryError;

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Past results of the signed-in user, for the dashboard.
#[derive(Clone)]
pub struct ResultHistoryService {
    results: Arc<dyn ResultRepository>,
}

impl ResultHistoryService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Most recent results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::SignedOut` when the backend requires a login and
    /// `HistoryError::Storage` for other failures.
    pub async fn recent(&self, limit: u32) -> Result<Vec<ResultSummary>, HistoryError> {
        match self.results.list_results(limit).await {
            Ok(rows) => Ok(rows),
            Err(StorageError::Unauthorized) => Err(HistoryError::SignedOut),
            Err(err) => Err(err.into()),
        }
    }
}
