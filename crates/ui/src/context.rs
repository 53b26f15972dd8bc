use std::sync::Arc;

use services::{AccountService, ResultHistoryService, SessionLoopService};

pub trait UiApp: Send + Sync {
    fn session_loop(&self) -> Arc<SessionLoopService>;
    fn accounts(&self) -> Arc<AccountService>;
    fn history(&self) -> Arc<ResultHistoryService>;
}

#[derive(Clone)]
pub struct AppContext {
    session_loop: Arc<SessionLoopService>,
    accounts: Arc<AccountService>,
    history: Arc<ResultHistoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session_loop: app.session_loop(),
            accounts: app.accounts(),
            history: app.history(),
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
