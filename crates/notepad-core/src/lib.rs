//! # notepad-core
//!
//! Core types, traits, and validation for the notepad client.
//!
//! This crate provides the note data model, the error taxonomy, the
//! [`NoteService`] seam that the HTTP binding and test doubles implement,
//! and the pure draft validation used by the create form.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validation::{validate, DraftField, FieldErrors, NoteDraft};
