//! Search and pagination state.
//!
//! `raw` follows every keystroke; `debounced` is what queries use and only
//! moves once the input has been quiet for the debounce window (trailing
//! edge, no max wait). A change of `debounced` resets `page` to 1 in the
//! same call, so no query is ever built from a new search and an old page.
//!
//! Time is passed in explicitly as [`tokio::time::Instant`], which keeps the
//! state machine synchronous and lets tests drive it with a paused clock.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use notepad_core::defaults;

use crate::pipeline::NotesKey;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    value: String,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    raw: String,
    debounced: String,
    page: u32,
    pending: Option<PendingSearch>,
    delay: Duration,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(defaults::SEARCH_DEBOUNCE)
    }
}

impl SearchState {
    pub fn new(delay: Duration) -> Self {
        Self {
            raw: String::new(),
            debounced: String::new(),
            page: defaults::FIRST_PAGE,
            pending: None,
            delay,
        }
    }

    /// Text as typed, for echoing back into the input.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text queries are built from.
    pub fn debounced(&self) -> &str {
        &self.debounced
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Record a keystroke: `raw` updates now, `debounced` after the quiet
    /// period. Each call restarts the timer.
    pub fn set_search(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        self.raw = value.clone();
        self.pending = Some(PendingSearch {
            value,
            deadline: now + self.delay,
        });
    }

    /// Apply the pending search if its deadline has passed.
    ///
    /// Returns `true` when `debounced` changed (and `page` was reset).
    pub fn settle(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.apply_pending(),
            _ => false,
        }
    }

    /// Apply the pending search immediately, whatever its deadline.
    pub fn flush(&mut self) -> bool {
        self.apply_pending()
    }

    fn apply_pending(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if pending.value == self.debounced {
            return false;
        }

        debug!(
            query = %pending.value,
            previous_page = self.page,
            "Search settled, resetting page"
        );
        self.debounced = pending.value;
        self.page = defaults::FIRST_PAGE;
        true
    }

    /// Jump to a page. Search text is left alone and `n` is not clamped.
    pub fn set_page(&mut self, n: u32) {
        self.page = n;
    }

    /// When the pending search will settle, if one is waiting.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Query key for the current page and settled search.
    pub fn key(&self, per_page: u32) -> NotesKey {
        NotesKey::new(self.page, self.debounced.clone(), per_page)
    }
}
