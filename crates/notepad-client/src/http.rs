//! reqwest-backed remote note service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use notepad_core::{CreateNoteRequest, Error, ListNotesRequest, Note, NotePage, NoteService, Result};

use crate::config::ClientConfig;
use crate::error::status_to_error;

/// Remote note service over HTTP.
pub struct HttpNoteService {
    client: Client,
    config: ClientConfig,
}

impl HttpNoteService {
    /// Create a new service with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            token_set = config.token.is_some(),
            "Initializing note service client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a response into `T`, mapping non-2xx statuses to core errors.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "Failed to read error response body");
                    String::new()
                }
            };
            let err = status_to_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "Note service returned an error");
            return Err(err);
        }

        // decode failures convert to Error::Serialization
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl NoteService for HttpNoteService {
    #[instrument(skip(self, req), fields(subsystem = "client", component = "http", op = "list_notes", page = req.page, query = %req.search))]
    async fn list_notes(&self, req: &ListNotesRequest) -> Result<NotePage> {
        let start = Instant::now();

        let response = self
            .authorize(self.client.get(self.config.notes_url()))
            .query(req)
            .send()
            .await?;

        let page: NotePage = Self::decode(response).await?;

        debug!(
            result_count = page.notes.len(),
            total_pages = page.total_pages,
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(page)
    }

    #[instrument(skip(self, req), fields(subsystem = "client", component = "http", op = "create_note", tag = %req.tag))]
    async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note> {
        let start = Instant::now();

        let response = self
            .authorize(self.client.post(self.config.notes_url()))
            .json(req)
            .send()
            .await?;

        let note: Note = Self::decode(response).await?;

        info!(
            note_id = %note.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Created note"
        );
        Ok(note)
    }
}
