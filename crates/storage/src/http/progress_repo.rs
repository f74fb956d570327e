use theory_core::model::{NewProgress, ProgressRecord, ProgressUpdate, QuestionId, RecordId, UserId};

use super::mapping::{NewProgressWire, ProgressPatchWire, ProgressWire};
use super::{HttpRepository, check_status, read_json, transport};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for HttpRepository {
    async fn list_progress(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let url = self.endpoint("progress")?;
        let response = self
            .client()
            .get(url)
            .query(&[("userId", user.value())])
            .send()
            .await
            .map_err(transport)?;

        let wires: Vec<ProgressWire> = read_json(response).await?;
        Ok(wires.into_iter().map(ProgressWire::into_record).collect())
    }

    async fn find_progress(
        &self,
        user: UserId,
        question: &QuestionId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let url = self.endpoint("progress")?;
        let response = self
            .client()
            .get(url)
            .query(&[("userId", user.value().to_string())])
            .query(&[("questionId", question.as_str())])
            .send()
            .await
            .map_err(transport)?;

        let wires: Vec<ProgressWire> = read_json(response).await?;
        if wires.len() > 1 {
            tracing::warn!(
                user = %user,
                question = %question,
                count = wires.len(),
                "duplicate progress records; using the first"
            );
        }
        Ok(wires.into_iter().next().map(ProgressWire::into_record))
    }

    async fn create_progress(&self, record: &NewProgress) -> Result<ProgressRecord, StorageError> {
        let url = self.endpoint("progress")?;
        tracing::debug!(user = %record.user_id, question = %record.question_id, "creating progress record");

        let response = self
            .client()
            .post(url)
            .json(&NewProgressWire::from_domain(record))
            .send()
            .await
            .map_err(transport)?;

        let wire: ProgressWire = read_json(response).await?;
        Ok(wire.into_record())
    }

    async fn update_progress(
        &self,
        id: RecordId,
        update: &ProgressUpdate,
    ) -> Result<ProgressRecord, StorageError> {
        let url = self.endpoint(&format!("progress/{id}"))?;
        let response = self
            .client()
            .patch(url)
            .json(&ProgressPatchWire::from_domain(update))
            .send()
            .await
            .map_err(transport)?;

        let wire: ProgressWire = read_json(response).await?;
        Ok(wire.into_record())
    }

    async fn delete_progress(&self, id: RecordId) -> Result<(), StorageError> {
        let url = self.endpoint(&format!("progress/{id}"))?;
        let response = self.client().delete(url).send().await.map_err(transport)?;
        check_status(response)?;
        Ok(())
    }
}
