use async_trait::async_trait;
use reqwest::StatusCode;

use super::{HttpRepository, check_status, mapping, request_error};
use crate::repository::{AccountRepository, StorageError, UserProfile};

#[async_trait]
impl AccountRepository for HttpRepository {
    async fn current_user(&self) -> Result<Option<UserProfile>, StorageError> {
        let url = self.endpoint(&["auth", "me"])?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(request_error)?;
        // 401 is the normal signed-out answer
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let body = check_status(response)?
            .text()
            .await
            .map_err(request_error)?;

        mapping::parse_user(&body).map(Some)
    }

    async fn logout(&self) -> Result<(), StorageError> {
        let url = self.endpoint(&["auth", "logout"])?;
        let response = self
            .client()
            .post(url)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?;
        Ok(())
    }
}
