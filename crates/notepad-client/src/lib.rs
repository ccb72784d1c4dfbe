//! # notepad-client
//!
//! HTTP binding for the remote note service.
//!
//! [`HttpNoteService`] implements [`notepad_core::NoteService`] against a
//! NoteHub-compatible REST API:
//!
//! | Operation     | Request                                   |
//! |---------------|-------------------------------------------|
//! | `list_notes`  | `GET {base}/notes?page=&perPage=&search=` |
//! | `create_note` | `POST {base}/notes` with a JSON body      |
//!
//! # Example
//!
//! ```rust,no_run
//! use notepad_client::{ClientConfig, HttpNoteService};
//! use notepad_core::{ListNotesRequest, NoteService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = HttpNoteService::new(ClientConfig::from_env()).unwrap();
//!     let page = service.list_notes(&ListNotesRequest::default()).await.unwrap();
//!     println!("{} notes", page.notes.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::ClientConfig;
pub use error::{status_to_error, ServiceErrorCode};
pub use http::HttpNoteService;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockNoteService;
