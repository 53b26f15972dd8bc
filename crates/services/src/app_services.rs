use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::account_service::AccountService;
use crate::config::AppConfig;
use crate::error::AppServicesError;
use crate::history_service::ResultHistoryService;
use crate::sessions::SessionLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    session_loop: Arc<SessionLoopService>,
    accounts: Arc<AccountService>,
    history: Arc<ResultHistoryService>,
}

impl AppServices {
    /// Build services backed by the REST API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new_http(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::http(&config.http_config()?)?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let session_loop = Arc::new(SessionLoopService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.results),
        ));
        let accounts = Arc::new(AccountService::new(Arc::clone(&storage.accounts)));
        let history = Arc::new(ResultHistoryService::new(Arc::clone(&storage.results)));
        Self {
            session_loop,
            accounts,
            history,
        }
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn history(&self) -> Arc<ResultHistoryService> {
        Arc::clone(&self.history)
    }
}
