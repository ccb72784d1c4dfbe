//! Core data models for the notepad client.
//!
//! These types mirror the remote note service's wire format and are shared
//! by the HTTP binding and the client-side orchestration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::Error;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Server-assigned note identifier.
pub type NoteId = String;

/// Closed set of note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    /// Every tag, in display order.
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag names are matched exactly; `"todo"` is not a tag.
impl FromStr for NoteTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown note tag: {s:?}")))
    }
}

/// A note as returned by the remote service. Never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// LISTING
// =============================================================================

/// One page of notes for a (page, search) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

impl NotePage {
    /// A page with no notes and a single (empty) page total.
    pub fn empty() -> Self {
        Self {
            notes: Vec::new(),
            total_pages: defaults::TOTAL_PAGES_FALLBACK,
        }
    }
}

/// Query parameters for listing notes.
///
/// Serialized as the list endpoint's query string; an empty search is left
/// out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesRequest {
    pub page: u32,
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
}

impl ListNotesRequest {
    pub fn new(page: u32, search: impl Into<String>, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            search: search.into(),
        }
    }
}

impl Default for ListNotesRequest {
    fn default() -> Self {
        Self::new(defaults::FIRST_PAGE, "", defaults::PER_PAGE)
    }
}

// =============================================================================
// CREATION
// =============================================================================

/// Validated body of a create request.
///
/// Built from a [`NoteDraft`](crate::validation::NoteDraft) that passed
/// validation; see [`NoteDraft::to_request`](crate::validation::NoteDraft::to_request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}
