//! Note list fetch pipeline.
//!
//! Turns the active [`NotesKey`] into a [`FetchState`] backed by the query
//! cache. While the active key has no data yet, the last key that did is
//! shown instead, so the list never flashes empty between pages or
//! searches.

use std::sync::Arc;
use tracing::instrument;

use notepad_core::{defaults, ListNotesRequest, NotePage, NoteService};

use crate::query_cache::{QueryCache, QueryKey, QueryResult};

/// Cache of note list pages.
pub type NotesCache = QueryCache<NotesKey, NotePage>;

/// Identity of one list fetch: `("notes", page, search, per_page)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotesKey {
    pub page: u32,
    pub search: String,
    pub per_page: u32,
}

impl NotesKey {
    pub fn new(page: u32, search: impl Into<String>, per_page: u32) -> Self {
        Self {
            page,
            search: search.into(),
            per_page,
        }
    }

    pub fn to_request(&self) -> ListNotesRequest {
        ListNotesRequest::new(self.page, self.search.clone(), self.per_page)
    }
}

impl QueryKey for NotesKey {
    fn namespace(&self) -> &str {
        defaults::NOTES_QUERY_NAMESPACE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Success,
    Error,
}

/// What the list should display right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState {
    pub status: FetchStatus,
    /// Active key's data, or the previous key's while it loads or fails.
    pub data: Option<NotePage>,
    pub error: Option<String>,
    /// `data` belongs to an earlier key.
    pub is_placeholder: bool,
    pub is_fetching: bool,
}

impl FetchState {
    fn idle() -> Self {
        Self {
            status: FetchStatus::Pending,
            data: None,
            error: None,
            is_placeholder: false,
            is_fetching: false,
        }
    }
}

pub struct NotesQuery {
    service: Arc<dyn NoteService>,
    cache: NotesCache,
    active: Option<NotesKey>,
    previous: Option<NotesKey>,
}

impl NotesQuery {
    pub fn new(service: Arc<dyn NoteService>, cache: NotesCache) -> Self {
        Self {
            service,
            cache,
            active: None,
            previous: None,
        }
    }

    pub fn cache(&self) -> &NotesCache {
        &self.cache
    }

    pub fn active_key(&self) -> Option<&NotesKey> {
        self.active.as_ref()
    }

    /// Switch to `key`. The outgoing key becomes the placeholder source if
    /// it had data to show.
    pub fn activate(&mut self, key: NotesKey) {
        if self.active.as_ref() == Some(&key) {
            return;
        }
        if let Some(outgoing) = self.active.take() {
            if self.cache.has_data(&outgoing) {
                self.previous = Some(outgoing);
            }
        }
        self.active = Some(key);
    }

    /// Fetch the active key through the cache.
    #[instrument(skip(self), fields(subsystem = "app", component = "pipeline", op = "fetch"))]
    pub async fn fetch(&self) -> Option<QueryResult<NotePage>> {
        let key = self.active.clone()?;
        let service = Arc::clone(&self.service);
        let request = key.to_request();

        let result = self
            .cache
            .fetch(key, move || {
                let service = Arc::clone(&service);
                let request = request.clone();
                async move { service.list_notes(&request).await }
            })
            .await;
        Some(result)
    }

    /// Activate `key`, fetch it, and return the resulting display state.
    pub async fn load(&mut self, key: NotesKey) -> FetchState {
        self.activate(key);
        self.fetch().await;
        self.state()
    }

    pub fn state(&self) -> FetchState {
        let Some(active) = &self.active else {
            return FetchState::idle();
        };

        let entry = self.cache.entry(active);
        let is_fetching = entry.as_ref().is_some_and(|e| e.fetching);
        let error = entry
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .map(|err| err.to_string());

        let (data, is_placeholder) = match entry.and_then(|e| e.data) {
            Some(data) => (Some(data), false),
            None => {
                let placeholder = self
                    .previous
                    .as_ref()
                    .and_then(|prev| self.cache.entry(prev))
                    .and_then(|e| e.data);
                let is_placeholder = placeholder.is_some();
                (placeholder, is_placeholder)
            }
        };

        let status = if error.is_some() {
            FetchStatus::Error
        } else if data.is_some() && !is_placeholder {
            FetchStatus::Success
        } else {
            FetchStatus::Pending
        };

        FetchState {
            status,
            data,
            error,
            is_placeholder,
            is_fetching,
        }
    }
}
