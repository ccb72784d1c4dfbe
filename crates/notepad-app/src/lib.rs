//! # notepad-app
//!
//! Client-side orchestration for browsing and creating notes.
//!
//! - [`search`]: raw and debounced search text plus the current page
//! - [`query_cache`]: keyed result cache with deduplication, invalidation,
//!   and retry
//! - [`pipeline`]: turns the current key into a displayable [`FetchState`]
//! - [`form`]: the create-note form and its submit lifecycle
//! - [`shell`]: ties the above together and derives an [`AppView`]
//!
//! [`browse`], [`cli`], and [`logging`] make up the `notepad` binary.

pub mod browse;
pub mod cli;
pub mod form;
pub mod logging;
pub mod pipeline;
pub mod query_cache;
pub mod search;
pub mod shell;

pub use form::{CreateForm, FormPhase, SubmitOutcome};
pub use pipeline::{FetchState, FetchStatus, NotesCache, NotesKey, NotesQuery};
pub use query_cache::{QueryCache, QueryCacheConfig, QueryKey, RetryPolicy};
pub use search::SearchState;
pub use shell::{AppShell, AppView};
