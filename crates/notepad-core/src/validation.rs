//! Create-form draft and its validation schema.
//!
//! Validation is pure and synchronous: [`validate`] maps a draft to at most
//! one message per offending field and never touches the network.
//!
//! | Field   | Rule                                  |
//! |---------|---------------------------------------|
//! | title   | required, 3..=50 characters           |
//! | content | optional, at most 500 characters      |
//! | tag     | required, one of the five note tags   |
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use std::collections::BTreeMap;
use std::fmt;

use crate::defaults::{CONTENT_MAX_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN};
use crate::models::{CreateNoteRequest, NoteTag};

pub const MSG_REQUIRED: &str = "Required field";
pub const MSG_TITLE_TOO_SHORT: &str = "Minimum 3 symbols";
pub const MSG_TITLE_TOO_LONG: &str = "Maximum 50 symbols";
pub const MSG_CONTENT_TOO_LONG: &str = "Maximum 500 symbols";
pub const MSG_TAG_UNKNOWN: &str =
    "tag must be one of the following values: Todo, Work, Personal, Meeting, Shopping";

/// Editable form state for a new note.
///
/// `tag` is free text so that a value outside [`NoteTag`] can be held and
/// rejected by validation rather than by the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().as_str().to_string(),
        }
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag: tag.into(),
        }
    }

    /// Validate and convert into a create request carrying exactly the
    /// draft's three fields.
    pub fn to_request(&self) -> Result<CreateNoteRequest, FieldErrors> {
        let errors = validate(self);
        if !errors.is_empty() {
            return Err(errors);
        }

        // validate() has already accepted the tag
        let tag = self.tag.parse::<NoteTag>().map_err(|_| {
            let mut errors = FieldErrors::default();
            errors.insert(DraftField::Tag, MSG_TAG_UNKNOWN);
            errors
        })?;

        Ok(CreateNoteRequest {
            title: self.title.clone(),
            content: self.content.clone(),
            tag,
        })
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    Title,
    Content,
    Tag,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Content => "content",
            DraftField::Tag => "tag",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to message, at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: DraftField, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Check a draft against the note schema.
pub fn validate(draft: &NoteDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let title_len = draft.title.chars().count();
    if draft.title.is_empty() {
        errors.insert(DraftField::Title, MSG_REQUIRED);
    } else if title_len < TITLE_MIN_LEN {
        errors.insert(DraftField::Title, MSG_TITLE_TOO_SHORT);
    } else if title_len > TITLE_MAX_LEN {
        errors.insert(DraftField::Title, MSG_TITLE_TOO_LONG);
    }

    if draft.content.chars().count() > CONTENT_MAX_LEN {
        errors.insert(DraftField::Content, MSG_CONTENT_TOO_LONG);
    }

    if draft.tag.is_empty() {
        errors.insert(DraftField::Tag, MSG_REQUIRED);
    } else if draft.tag.parse::<NoteTag>().is_err() {
        errors.insert(DraftField::Tag, MSG_TAG_UNKNOWN);
    }

    errors
}
