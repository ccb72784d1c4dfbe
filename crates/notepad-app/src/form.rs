//! Create-note form.
//!
//! ```text
//! Editing --submit(valid)--> Submitting --ok--> Closed
//!    ^  |                         |
//!    |  +--submit(invalid)--+     +--err--> Editing (draft kept)
//!    +----------------------+
//! Editing --cancel--> Closed
//! ```
//!
//! Validation failures and submit failures both leave the form in
//! `Editing`; they differ in where the message is kept.

use tracing::{info, instrument, warn};

use notepad_core::{defaults, CreateNoteRequest, FieldErrors, Note, NoteDraft, NoteService};

use crate::pipeline::NotesCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Closed,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    Created(Note),
    /// The service refused or could not be reached.
    Failed(String),
    /// The form was not in `Editing`.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CreateForm {
    draft: NoteDraft,
    phase: FormPhase,
    errors: FieldErrors,
    submit_error: Option<String>,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateForm {
    /// Open form with the default draft (`"", "", "Todo"`).
    pub fn new() -> Self {
        Self {
            draft: NoteDraft::default(),
            phase: FormPhase::Editing,
            errors: FieldErrors::default(),
            submit_error: None,
        }
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == FormPhase::Closed
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.phase == FormPhase::Editing {
            self.draft.title = title.into();
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.phase == FormPhase::Editing {
            self.draft.content = content.into();
        }
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        if self.phase == FormPhase::Editing {
            self.draft.tag = tag.into();
        }
    }

    /// Validate the draft and, if it passes, move to `Submitting`.
    ///
    /// On `Err` the form stays in `Editing` and the outcome should be
    /// returned to the caller as is.
    pub fn begin_submit(&mut self) -> Result<CreateNoteRequest, SubmitOutcome> {
        if self.phase != FormPhase::Editing {
            return Err(SubmitOutcome::Ignored);
        }

        match self.draft.to_request() {
            Ok(request) => {
                self.errors = FieldErrors::default();
                self.submit_error = None;
                self.phase = FormPhase::Submitting;
                Ok(request)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Apply the create result. Success invalidates every note list query.
    pub fn finish_submit(
        &mut self,
        result: notepad_core::Result<Note>,
        cache: &NotesCache,
    ) -> SubmitOutcome {
        if self.phase != FormPhase::Submitting {
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(note) => {
                let invalidated = cache.invalidate(defaults::NOTES_QUERY_NAMESPACE);
                info!(note_id = %note.id, invalidated, "Note created");
                self.draft = NoteDraft::default();
                self.phase = FormPhase::Closed;
                SubmitOutcome::Created(note)
            }
            Err(err) => {
                warn!(error = %err, "Note creation failed");
                let message = err.to_string();
                self.submit_error = Some(message.clone());
                self.phase = FormPhase::Editing;
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Validate, create, and apply the result.
    #[instrument(skip_all, fields(subsystem = "app", component = "form", op = "submit"))]
    pub async fn submit(&mut self, service: &dyn NoteService, cache: &NotesCache) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let result = service.create_note(&request).await;
        self.finish_submit(result, cache)
    }

    /// Discard the draft and close. Refused while a submit is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.phase == FormPhase::Submitting {
            return false;
        }
        self.draft = NoteDraft::default();
        self.errors = FieldErrors::default();
        self.submit_error = None;
        self.phase = FormPhase::Closed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepad_client::MockNoteService;
    use notepad_core::validation::{MSG_REQUIRED, MSG_TITLE_TOO_SHORT};
    use notepad_core::{DraftField, Error, NoteTag};

    fn filled(title: &str, content: &str, tag: &str) -> CreateForm {
        let mut form = CreateForm::new();
        form.set_title(title);
        form.set_content(content);
        form.set_tag(tag);
        form
    }

    #[test]
    fn test_new_form_defaults() {
        let form = CreateForm::new();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft(), &NoteDraft::new("", "", "Todo"));
        assert!(form.errors().is_empty());
        assert!(form.submit_error().is_none());
    }

    #[tokio::test]
    async fn test_invalid_draft_makes_no_request() {
        let service = MockNoteService::new();
        let cache = NotesCache::default();
        let mut form = filled("Hi", "", "Todo");

        let outcome = form.submit(&service, &cache).await;

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.get(DraftField::Title), Some(MSG_TITLE_TOO_SHORT));
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.errors().get(DraftField::Title), Some(MSG_TITLE_TOO_SHORT));
        assert_eq!(service.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_fixing_draft_clears_errors_on_next_submit() {
        let service = MockNoteService::new();
        let cache = NotesCache::default();
        let mut form = filled("", "", "Todo");

        form.submit(&service, &cache).await;
        assert_eq!(form.errors().get(DraftField::Title), Some(MSG_REQUIRED));

        form.set_title("Groceries");
        let outcome = form.submit(&service, &cache).await;
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_sends_exact_fields_and_closes() {
        let service = MockNoteService::new();
        let cache = NotesCache::default();
        let mut form = filled("Buy milk", "", "Shopping");

        let outcome = form.submit(&service, &cache).await;

        assert!(matches!(outcome, SubmitOutcome::Created(ref note) if note.title == "Buy milk"));
        assert_eq!(
            service.create_calls(),
            vec![CreateNoteRequest {
                title: "Buy milk".to_string(),
                content: String::new(),
                tag: NoteTag::Shopping,
            }]
        );
        assert!(form.is_closed());
        assert_eq!(form.draft(), &NoteDraft::default());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let service = MockNoteService::new().with_failing_create();
        let cache = NotesCache::default();
        let mut form = filled("Buy milk", "two litres", "Shopping");

        let outcome = form.submit(&service, &cache).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ref msg) if msg.contains("mock create failure")));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft(), &NoteDraft::new("Buy milk", "two litres", "Shopping"));
        assert!(form.submit_error().is_some());
        // no automatic retry
        assert_eq!(service.create_call_count(), 1);

        service.set_create_failure(false);
        let outcome = form.submit(&service, &cache).await;
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert!(form.submit_error().is_none());
    }

    #[test]
    fn test_edits_ignored_while_submitting() {
        let mut form = filled("Buy milk", "", "Shopping");
        form.begin_submit().unwrap();
        assert_eq!(form.phase(), FormPhase::Submitting);

        form.set_title("Changed");
        form.set_tag("Work");
        assert_eq!(form.draft().title, "Buy milk");
        assert_eq!(form.draft().tag, "Shopping");

        assert!(!form.cancel());
        assert!(matches!(form.begin_submit(), Err(SubmitOutcome::Ignored)));
    }

    #[test]
    fn test_finish_submit_requires_submitting() {
        let cache = NotesCache::default();
        let mut form = CreateForm::new();
        let outcome = form.finish_submit(Err(Error::Internal("late".to_string())), &cache);
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(form.submit_error().is_none());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut form = filled("Half-written", "", "Work");
        assert!(form.cancel());
        assert!(form.is_closed());
        assert_eq!(form.draft(), &NoteDraft::default());
    }
}
