use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::repository::{ExamRepository, ProgressRepository, QuestionRepository, Storage, StorageError};

mod exam_repo;
mod mapping;
mod progress_repo;
mod question_repo;

/// Repository backed by the json-server-style record store.
///
/// One collection per entity (`questions`, `progress`, `exam`), equality
/// query filters, store-assigned numeric ids. Individual record writes are
/// serialized by the store; nothing here spans more than one record.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid record store url: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

impl HttpRepository {
    /// Build a client for the record store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the URL does not parse or the client
    /// cannot be constructed.
    pub fn connect(base_url: &str) -> Result<Self, HttpInitError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| HttpInitError::InvalidBaseUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

pub(crate) fn transport(error: reqwest::Error) -> StorageError {
    StorageError::Connection(error.to_string())
}

/// Map the store's response status and decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StorageError> {
    let response = check_status(response)?;
    response
        .json()
        .await
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn check_status(response: Response) -> Result<Response, StorageError> {
    match response.status() {
        StatusCode::NOT_FOUND => Err(StorageError::NotFound),
        StatusCode::CONFLICT => Err(StorageError::Conflict),
        status if !status.is_success() => Err(StorageError::Status(status.as_u16())),
        _ => Ok(response),
    }
}

impl Storage {
    /// Build a `Storage` backed by the HTTP record store.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the client cannot be constructed.
    pub fn http(base_url: &str) -> Result<Self, HttpInitError> {
        let repo = HttpRepository::connect(base_url)?;
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let exams: Arc<dyn ExamRepository> = Arc::new(repo);
        Ok(Self {
            questions,
            progress,
            exams,
        })
    }
}
