//! Top-level application state.
//!
//! [`AppShell`] owns the search and pagination state, the note list
//! pipeline, and the create form when it is open. Front ends feed it user
//! input, call [`AppShell::tick`] when the debounce deadline passes, and
//! render [`AppShell::view`].

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument};

use notepad_core::{defaults, Note, NoteService};

use crate::form::{CreateForm, SubmitOutcome};
use crate::pipeline::{FetchState, FetchStatus, NotesCache, NotesKey, NotesQuery};
use crate::query_cache::QueryCacheConfig;
use crate::search::SearchState;

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub notes: Vec<Note>,
    pub total_pages: u32,
    pub show_pagination: bool,
    /// Nothing to show yet for the current key.
    pub loading: bool,
    /// Last fetch failed. Never set together with `loading`.
    pub error: Option<String>,
    pub modal_open: bool,
    /// Search text as typed.
    pub search: String,
    pub page: u32,
}

impl AppView {
    fn from_state(state: &FetchState, search: &SearchState, modal_open: bool) -> Self {
        let (notes, total_pages) = match &state.data {
            Some(page) => (page.notes.clone(), page.total_pages),
            None => (Vec::new(), defaults::TOTAL_PAGES_FALLBACK),
        };
        let error = match state.status {
            FetchStatus::Error => state.error.clone(),
            _ => None,
        };
        let loading = state.status == FetchStatus::Pending && state.data.is_none();

        Self {
            show_pagination: total_pages > 1,
            notes,
            total_pages,
            loading,
            error,
            modal_open,
            search: search.raw().to_string(),
            page: search.page(),
        }
    }
}

pub struct AppShell {
    search: SearchState,
    query: NotesQuery,
    form: Option<CreateForm>,
    service: Arc<dyn NoteService>,
    per_page: u32,
}

impl AppShell {
    pub fn new(service: Arc<dyn NoteService>, config: QueryCacheConfig) -> Self {
        let cache = NotesCache::new(config);
        Self {
            search: SearchState::default(),
            query: NotesQuery::new(Arc::clone(&service), cache),
            form: None,
            service,
            per_page: defaults::PER_PAGE,
        }
    }

    /// Replace the search state, e.g. to use a different debounce delay.
    pub fn with_search(mut self, search: SearchState) -> Self {
        self.search = search;
        self
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn cache(&self) -> &NotesCache {
        self.query.cache()
    }

    pub fn set_search(&mut self, value: impl Into<String>) {
        self.search.set_search(value, Instant::now());
    }

    /// Settle the debounce if its deadline has passed. Returns `true` when
    /// the current key changed.
    pub fn tick(&mut self) -> bool {
        self.search.settle(Instant::now())
    }

    /// Settle the pending search right away.
    pub fn flush_search(&mut self) -> bool {
        self.search.flush()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    pub fn set_page(&mut self, n: u32) {
        self.search.set_page(n);
    }

    pub fn current_key(&self) -> NotesKey {
        self.search.key(self.per_page)
    }

    /// Load the current key and return the resulting state.
    #[instrument(skip(self), fields(subsystem = "app", component = "shell", op = "refresh"))]
    pub async fn refresh(&mut self) -> FetchState {
        let key = self.current_key();
        let (page, query) = (key.page, key.search.clone());

        let start = Instant::now();
        let state = self.query.load(key).await;
        debug!(
            page,
            query = %query,
            status = ?state.status,
            result_count = state.data.as_ref().map_or(0, |page| page.notes.len()),
            duration_ms = start.elapsed().as_millis() as u64,
            "Refreshed note list"
        );
        state
    }

    /// Open the create form with a fresh draft.
    pub fn open_form(&mut self) {
        self.form = Some(CreateForm::new());
    }

    pub fn form(&self) -> Option<&CreateForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut CreateForm> {
        self.form.as_mut()
    }

    /// Close the form, discarding its draft. Returns `false` if no form was
    /// open or it is mid-submit.
    pub fn cancel_form(&mut self) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        if !form.cancel() {
            return false;
        }
        self.form = None;
        true
    }

    /// Submit the open form. On success the modal closes and the current
    /// list is refetched. Returns `None` when no form is open.
    pub async fn submit_form(&mut self) -> Option<SubmitOutcome> {
        let form = self.form.as_mut()?;
        let outcome = form.submit(self.service.as_ref(), self.query.cache()).await;

        if form.is_closed() {
            self.form = None;
        }
        if matches!(outcome, SubmitOutcome::Created(_)) {
            self.refresh().await;
        }
        Some(outcome)
    }

    pub fn view(&self) -> AppView {
        AppView::from_state(&self.query.state(), &self.search, self.form.is_some())
    }
}
