use theory_core::model::{ExamRecord, NewExamRecord, RecordId, UserId};

use super::mapping::{ExamWire, NewExamWire};
use super::{HttpRepository, read_json, transport};
use crate::repository::{ExamRepository, StorageError};

#[async_trait::async_trait]
impl ExamRepository for HttpRepository {
    async fn list_exams(&self, user: UserId) -> Result<Vec<ExamRecord>, StorageError> {
        let url = self.endpoint("exam")?;
        let response = self
            .client()
            .get(url)
            .query(&[("userId", user.value())])
            .send()
            .await
            .map_err(transport)?;

        let wires: Vec<ExamWire> = read_json(response).await?;
        let mut records = Vec::with_capacity(wires.len());
        for wire in wires {
            let id = wire.id;
            match wire.into_record() {
                Ok(record) => records.push(record),
                // history views skip malformed rows instead of failing wholesale
                Err(error) => {
                    tracing::warn!(record = %id, %error, "skipping malformed exam record");
                }
            }
        }
        Ok(records)
    }

    async fn get_exam(&self, id: RecordId) -> Result<ExamRecord, StorageError> {
        let url = self.endpoint(&format!("exam/{id}"))?;
        let response = self.client().get(url).send().await.map_err(transport)?;

        let wire: ExamWire = read_json(response).await?;
        wire.into_record()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn create_exam(&self, record: &NewExamRecord) -> Result<ExamRecord, StorageError> {
        let url = self.endpoint("exam")?;
        tracing::debug!(user = %record.user_id, exam = %record.exam_id, "archiving exam record");

        let response = self
            .client()
            .post(url)
            .json(&NewExamWire::from_domain(record))
            .send()
            .await
            .map_err(transport)?;

        let wire: ExamWire = read_json(response).await?;
        wire.into_record()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
