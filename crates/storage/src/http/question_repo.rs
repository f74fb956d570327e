use theory_core::model::Question;

use super::mapping::QuestionWire;
use super::{HttpRepository, read_json, transport};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for HttpRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let url = self.endpoint("questions")?;
        tracing::debug!(%url, "fetching question bank");

        let response = self.client().get(url).send().await.map_err(transport)?;
        let wires: Vec<QuestionWire> = read_json(response).await?;
        Ok(wires.into_iter().map(QuestionWire::into_question).collect())
    }
}
