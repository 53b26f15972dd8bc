use async_trait::async_trait;
use ielts_core::model::{ModuleKind, QuestionSet, TestId};
use tracing::debug;

use super::{HttpRepository, check_status, mapping, request_error};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait]
impl QuestionRepository for HttpRepository {
    async fn fetch_question_set(
        &self,
        module: ModuleKind,
        test_id: &TestId,
    ) -> Result<QuestionSet, StorageError> {
        let url = self.endpoint(&["questions", module.slug(), test_id.as_str()])?;
        debug!(%url, "fetching question set");

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

        mapping::parse_question_set(module, test_id, &body)
    }
}
