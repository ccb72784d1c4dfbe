//! Mock note service for deterministic testing.
//!
//! Serves configured pages, records every call, and can be told to fail or
//! to hold requests until the test releases them.
//!
//! ## Usage
//!
//! ```rust
//! use notepad_client::mock::MockNoteService;
//! use notepad_core::{ListNotesRequest, NoteService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = MockNoteService::new().with_notes(1, "", 3, 2);
//! let page = service.list_notes(&ListNotesRequest::new(1, "", 12)).await.unwrap();
//! assert_eq!(page.notes.len(), 3);
//! assert_eq!(service.list_call_count(), 1);
//! # }
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;

use notepad_core::{
    CreateNoteRequest, Error, ListNotesRequest, Note, NotePage, NoteService, NoteTag, Result,
};

/// Mock note service for testing.
#[derive(Clone, Default)]
pub struct MockNoteService {
    state: Arc<Mutex<MockState>>,
    gate: Option<Arc<Semaphore>>,
    next_id: Arc<AtomicUsize>,
}

#[derive(Default)]
struct MockState {
    pages: HashMap<(u32, String), NotePage>,
    failing_lists: HashSet<(u32, String)>,
    transient_list_failures: usize,
    fail_creates: bool,
    latency: Duration,
    list_calls: Vec<ListNotesRequest>,
    create_calls: Vec<CreateNoteRequest>,
}

impl MockNoteService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for the given (page number, search) pair.
    pub fn with_page(self, page: u32, search: &str, result: NotePage) -> Self {
        self.lock().pages.insert((page, search.to_string()), result);
        self
    }

    /// Serve `count` generated notes for the given pair.
    pub fn with_notes(self, page: u32, search: &str, count: usize, total_pages: u32) -> Self {
        let result = NotePage {
            notes: (0..count)
                .map(|i| sample_note(&format!("p{}-{}", page, i), &format!("{} note {}", search, i)))
                .collect(),
            total_pages,
        };
        self.with_page(page, search, result)
    }

    /// Answer the given pair with a 500.
    pub fn with_failing_list(self, page: u32, search: &str) -> Self {
        self.lock().failing_lists.insert((page, search.to_string()));
        self
    }

    /// Answer every create with a 500.
    pub fn with_failing_create(self) -> Self {
        self.lock().fail_creates = true;
        self
    }

    /// Simulated latency for every call.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    /// Hold list requests until [`release`](Self::release) hands out permits.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `n` held list requests through.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Fail the next `n` list calls with a 503, whatever their key.
    pub fn fail_next_lists(&self, n: usize) {
        self.lock().transient_list_failures = n;
    }

    /// Toggle create failures after construction.
    pub fn set_create_failure(&self, fail: bool) {
        self.lock().fail_creates = fail;
    }

    /// Get all logged list calls for assertion.
    pub fn list_calls(&self) -> Vec<ListNotesRequest> {
        self.lock().list_calls.clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.lock().list_calls.len()
    }

    /// Get all logged create calls for assertion.
    pub fn create_calls(&self) -> Vec<CreateNoteRequest> {
        self.lock().create_calls.clone()
    }

    pub fn create_call_count(&self) -> usize {
        self.lock().create_calls.len()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        let mut state = self.lock();
        state.list_calls.clear();
        state.create_calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NoteService for MockNoteService {
    async fn list_notes(&self, req: &ListNotesRequest) -> Result<NotePage> {
        let latency = {
            let mut state = self.lock();
            state.list_calls.push(req.clone());
            state.latency
        };

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| Error::Internal(format!("mock gate closed: {}", e)))?
                .forget();
        }
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        if state.transient_list_failures > 0 {
            state.transient_list_failures -= 1;
            return Err(Error::Server {
                status: 503,
                message: "mock transient failure".to_string(),
            });
        }

        let key = (req.page, req.search.clone());
        if state.failing_lists.contains(&key) {
            return Err(Error::Server {
                status: 500,
                message: format!("mock failure for page {}", req.page),
            });
        }

        Ok(state.pages.get(&key).cloned().unwrap_or_else(NotePage::empty))
    }

    async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note> {
        let (latency, fail) = {
            let mut state = self.lock();
            state.create_calls.push(req.clone());
            (state.latency, state.fail_creates)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if fail {
            return Err(Error::Server {
                status: 500,
                message: "mock create failure".to_string(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Note {
            id: format!("mock-{}", id),
            title: req.title.clone(),
            content: req.content.clone(),
            tag: req.tag,
            created_at: None,
            updated_at: None,
        })
    }
}

/// A Todo note with the given id and title.
pub fn sample_note(id: &str, title: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: String::new(),
        tag: NoteTag::Todo,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_key_returns_empty_page() {
        let service = MockNoteService::new();
        let page = service.list_notes(&ListNotesRequest::default()).await.unwrap();
        assert_eq!(page, NotePage::empty());
    }

    #[tokio::test]
    async fn test_configured_page_and_call_log() {
        let service = MockNoteService::new().with_notes(2, "milk", 4, 3);
        let req = ListNotesRequest::new(2, "milk", 12);

        let page = service.list_notes(&req).await.unwrap();
        assert_eq!(page.notes.len(), 4);
        assert_eq!(page.total_pages, 3);
        assert_eq!(service.list_calls(), vec![req]);
    }

    #[tokio::test]
    async fn test_failing_list() {
        let service = MockNoteService::new().with_failing_list(1, "");
        let err = service.list_notes(&ListNotesRequest::default()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_transient_failures_are_consumed() {
        let service = MockNoteService::new();
        service.fail_next_lists(1);

        assert!(service.list_notes(&ListNotesRequest::default()).await.is_err());
        assert!(service.list_notes(&ListNotesRequest::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_echoes_fields() {
        let service = MockNoteService::new();
        let req = CreateNoteRequest {
            title: "Buy milk".to_string(),
            content: String::new(),
            tag: NoteTag::Shopping,
        };

        let note = service.create_note(&req).await.unwrap();
        assert_eq!(note.id, "mock-0");
        assert_eq!(note.tag, NoteTag::Shopping);
        assert_eq!(service.create_calls(), vec![req]);
    }

    #[tokio::test]
    async fn test_gate_holds_until_released() {
        let service = MockNoteService::new().gated();
        let req = ListNotesRequest::default();

        let (result, ()) = tokio::join!(service.list_notes(&req), async {
            tokio::task::yield_now().await;
            assert_eq!(service.list_call_count(), 1);
            service.release(1);
        });
        assert!(result.is_ok());
    }
}
