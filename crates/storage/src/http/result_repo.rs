use async_trait::async_trait;
use ielts_core::model::SessionResult;
use tracing::debug;

use super::{HttpRepository, check_status, mapping, request_error};
use crate::repository::{ResultRepository, ResultSummary, StorageError};

#[async_trait]
impl ResultRepository for HttpRepository {
    async fn submit_result(&self, result: &SessionResult) -> Result<(), StorageError> {
        let url = self.endpoint(&["results", "submit"])?;
        debug!(%url, session = %result.session_id(), "posting result");

        let response = self
            .client()
            .post(url)
            .json(result)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?;
        Ok(())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultSummary>, StorageError> {
        let mut url = self.endpoint(&["results", "mine"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(request_error)?;
        let body = check_status(response)?
            .text()
            .await
            .map_err(request_error)?;

        mapping::parse_result_list(&body)
    }
}
