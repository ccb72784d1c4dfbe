//! Core traits for the notepad client.
//!
//! [`NoteService`] is the seam between the client-side orchestration and
//! the remote note service. The HTTP binding lives in `notepad-client`;
//! tests substitute a mock.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateNoteRequest, ListNotesRequest, Note, NotePage};

/// Remote note service contract.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Fetch one page of notes matching the search text.
    async fn list_notes(&self, req: &ListNotesRequest) -> Result<NotePage>;

    /// Create a note and return it with its server-assigned id.
    async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note>;
}
