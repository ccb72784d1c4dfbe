//! Centralized default constants for the notepad client.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

use std::time::Duration;

// =============================================================================
// PAGINATION
// =============================================================================

/// Notes requested per page.
pub const PER_PAGE: u32 = 12;

/// First page number. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// Total pages assumed while no result is available.
pub const TOTAL_PAGES_FALLBACK: u32 = 1;

// =============================================================================
// SEARCH
// =============================================================================

/// Quiet period after the last keystroke before a search takes effect.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// [`SEARCH_DEBOUNCE_MS`] as a [`Duration`].
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(SEARCH_DEBOUNCE_MS);

// =============================================================================
// QUERY CACHE
// =============================================================================

/// First key segment shared by every note list query.
pub const NOTES_QUERY_NAMESPACE: &str = "notes";

/// Retries after the first failed attempt of a retryable query.
pub const QUERY_RETRY_COUNT: u32 = 3;

/// Backoff before the first retry; doubles on every further attempt.
pub const QUERY_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Upper bound on a single retry backoff.
pub const QUERY_RETRY_MAX_DELAY_MS: u64 = 30_000;

// =============================================================================
// NOTE LIMITS
// =============================================================================

/// Minimum title length in characters.
pub const TITLE_MIN_LEN: usize = 3;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 50;

/// Maximum content length in characters.
pub const CONTENT_MAX_LEN: usize = 500;

// =============================================================================
// REMOTE SERVICE
// =============================================================================

/// Default NoteHub API base URL.
pub const API_BASE_URL: &str = "https://notehub-public.goit.study/api";

/// Default HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
