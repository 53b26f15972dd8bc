use std::sync::{Arc, RwLock};

use storage::repository::{AccountRepository, StorageError, UserProfile, UserRole};
use tracing::{info, warn};

use crate::error::AccountError;

/// Who is signed in, loaded from the backend's cookie session.
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    current: RwLock<Option<UserProfile>>,
}

impl AccountService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self {
            accounts,
            current: RwLock::new(None),
        }
    }

    /// Ask the backend for the current user and cache the answer.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` when the backend cannot be reached.
    /// Being signed out is not an error.
    pub async fn load(&self) -> Result<Option<UserProfile>, AccountError> {
        let user = match self.accounts.current_user().await {
            Ok(user) => user,
            Err(StorageError::Unauthorized) => None,
            Err(err) => return Err(err.into()),
        };
        self.replace(user.clone());
        Ok(user)
    }

    #[must_use]
    pub fn current(&self) -> Option<UserProfile> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current()
            .is_some_and(|user| user.role == UserRole::Admin)
    }

    /// Sign out locally, then tell the backend.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the backend call fails; the local
    /// state is cleared regardless.
    pub async fn logout(&self) -> Result<(), AccountError> {
        self.replace(None);
        match self.accounts.logout().await {
            Ok(()) => {
                info!("signed out");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "remote logout failed");
                Err(err.into())
            }
        }
    }

    fn replace(&self, user: Option<UserProfile>) {
        match self.current.write() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }
}
