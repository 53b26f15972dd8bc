use std::sync::Arc;

use ielts_core::model::SessionResult;
use storage::repository::ResultRepository;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered,
    /// The backend did not accept the result. It is not retried.
    Dropped,
}

/// Best-effort delivery of finished results.
#[derive(Clone)]
pub struct ResultSubmitter {
    results: Arc<dyn ResultRepository>,
}

impl ResultSubmitter {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Send one result and report what happened. Failures are logged, never returned.
    pub async fn submit(&self, result: &SessionResult) -> SubmitOutcome {
        match self.results.submit_result(result).await {
            Ok(()) => {
                info!(
                    session = %result.session_id(),
                    module = %result.module(),
                    band = result.band(),
                    "result delivered"
                );
                SubmitOutcome::Delivered
            }
            Err(err) => {
                warn!(session = %result.session_id(), %err, "result dropped");
                SubmitOutcome::Dropped
            }
        }
    }

    /// Fire-and-forget variant of [`ResultSubmitter::submit`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, result: SessionResult) -> JoinHandle<SubmitOutcome> {
        let submitter = self.clone();
        tokio::spawn(async move { submitter.submit(&result).await })
    }
}
