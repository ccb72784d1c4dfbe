//! Line-oriented interactive front end.
//!
//! Reads commands from an async line source and redraws the list after
//! every change. Plain text is treated as search input, so typing behaves
//! like the search box: the list only refreshes once input has been quiet
//! for the debounce window.

use std::fmt::Write as _;
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;
use tracing::debug;

use crate::form::{CreateForm, SubmitOutcome};
use crate::shell::{AppShell, AppView};

pub const HELP: &str = "\
commands:
  <text> | /s <text>   search (applies after a short pause)
  /p <n>               go to page n
  /new                 open the create form
  /title <text>        set the draft title
  /content <text>      set the draft content
  /tag <tag>           set the draft tag
  /save                submit the form
  /cancel              close the form
  /help                show this help
  /q                   quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Page(u32),
    OpenForm,
    SetTitle(String),
    SetContent(String),
    SetTag(String),
    Save,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try /help)")]
    Unknown(String),

    #[error("not a page number: {0}")]
    InvalidPage(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(BrowseCommand::Search(line.to_string()));
        };

        let (name, arg) = match rest.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (rest, ""),
        };

        let command = match name {
            "s" => BrowseCommand::Search(arg.to_string()),
            "p" => {
                let arg = arg.trim();
                if arg.is_empty() {
                    return Err(CommandError::MissingArgument("/p"));
                }
                let n = arg
                    .parse()
                    .map_err(|_| CommandError::InvalidPage(arg.to_string()))?;
                BrowseCommand::Page(n)
            }
            "new" => BrowseCommand::OpenForm,
            "title" => BrowseCommand::SetTitle(arg.to_string()),
            "content" => BrowseCommand::SetContent(arg.to_string()),
            "tag" => {
                if arg.trim().is_empty() {
                    return Err(CommandError::MissingArgument("/tag"));
                }
                BrowseCommand::SetTag(arg.trim().to_string())
            }
            "save" => BrowseCommand::Save,
            "cancel" => BrowseCommand::Cancel,
            "help" | "h" => BrowseCommand::Help,
            "q" | "quit" => BrowseCommand::Quit,
            other => return Err(CommandError::Unknown(format!("/{}", other))),
        };
        Ok(command)
    }
}

/// Render the list pane.
pub fn render_view(view: &AppView) -> String {
    let mut out = String::new();

    if !view.search.is_empty() {
        let _ = writeln!(out, "search: {}", view.search);
    }
    if view.loading {
        out.push_str("loading...\n");
    } else if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {}", error);
    }

    if view.notes.is_empty() && !view.loading {
        out.push_str("(no notes)\n");
    }
    for (i, note) in view.notes.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. [{}] {}", i + 1, note.tag, note.title);
        if !note.content.is_empty() {
            let _ = writeln!(out, "     {}", note.content);
        }
    }

    if view.show_pagination {
        let _ = writeln!(out, "page {} of {}", view.page, view.total_pages);
    }
    out
}

/// Render the open create form.
pub fn render_form(form: &CreateForm) -> String {
    let draft = form.draft();
    let errors = form.errors();
    let mut out = String::from("new note\n");

    let fields = [
        ("title", &draft.title, notepad_core::DraftField::Title),
        ("content", &draft.content, notepad_core::DraftField::Content),
        ("tag", &draft.tag, notepad_core::DraftField::Tag),
    ];
    for (label, value, field) in fields {
        let _ = write!(out, "  {:<8}{}", label, value);
        if let Some(message) = errors.get(field) {
            let _ = write!(out, "  <- {}", message);
        }
        out.push('\n');
    }
    if let Some(error) = form.submit_error() {
        let _ = writeln!(out, "  could not save: {}", error);
    }
    out
}

/// Apply one command. Returns `false` when the session should end.
pub async fn apply<W: Write>(
    shell: &mut AppShell,
    command: BrowseCommand,
    out: &mut W,
) -> anyhow::Result<bool> {
    debug!(command = ?command, "Browse command");

    match command {
        BrowseCommand::Search(text) => shell.set_search(text),
        BrowseCommand::Page(n) => {
            shell.set_page(n);
            shell.refresh().await;
            write!(out, "{}", render_view(&shell.view()))?;
        }
        BrowseCommand::OpenForm => {
            shell.open_form();
            if let Some(form) = shell.form() {
                write!(out, "{}", render_form(form))?;
            }
        }
        BrowseCommand::SetTitle(_) | BrowseCommand::SetContent(_) | BrowseCommand::SetTag(_) => {
            let Some(form) = shell.form_mut() else {
                writeln!(out, "no form open (use /new)")?;
                return Ok(true);
            };
            match command {
                BrowseCommand::SetTitle(v) => form.set_title(v),
                BrowseCommand::SetContent(v) => form.set_content(v),
                BrowseCommand::SetTag(v) => form.set_tag(v),
                _ => {}
            }
        }
        BrowseCommand::Save => match shell.submit_form().await {
            None => writeln!(out, "no form open (use /new)")?,
            Some(SubmitOutcome::Created(note)) => {
                writeln!(out, "created {} ({})", note.title, note.id)?;
                write!(out, "{}", render_view(&shell.view()))?;
            }
            Some(SubmitOutcome::Invalid(_)) | Some(SubmitOutcome::Failed(_)) => {
                if let Some(form) = shell.form() {
                    write!(out, "{}", render_form(form))?;
                }
            }
            Some(SubmitOutcome::Ignored) => writeln!(out, "already saving")?,
        },
        BrowseCommand::Cancel => {
            if shell.cancel_form() {
                write!(out, "{}", render_view(&shell.view()))?;
            } else {
                writeln!(out, "no form open")?;
            }
        }
        BrowseCommand::Help => writeln!(out, "{}", HELP)?,
        BrowseCommand::Quit => return Ok(false),
    }
    out.flush()?;
    Ok(true)
}

/// Run the session until `/q` or end of input.
pub async fn run<R, W>(shell: &mut AppShell, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    shell.refresh().await;
    write!(out, "{}", render_view(&shell.view()))?;
    out.flush()?;

    loop {
        let deadline = shell.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match BrowseCommand::parse(line.trim_end()) {
                    Ok(command) => {
                        if !apply(shell, command, out).await? {
                            break;
                        }
                    }
                    Err(err) => writeln!(out, "{}", err)?,
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if shell.tick() {
                    shell.refresh().await;
                    write!(out, "{}", render_view(&shell.view()))?;
                    out.flush()?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_cache::{QueryCacheConfig, RetryPolicy};
    use notepad_client::mock::sample_note;
    use notepad_client::MockNoteService;
    use notepad_core::{CreateNoteRequest, NoteTag};
    use std::sync::Arc;

    fn shell(service: &MockNoteService) -> AppShell {
        AppShell::new(
            Arc::new(service.clone()),
            QueryCacheConfig::default().with_retry(RetryPolicy::none()),
        )
    }

    #[test]
    fn test_parse_commands() {
        let cases = [
            ("groceries", BrowseCommand::Search("groceries".to_string())),
            ("/s milk", BrowseCommand::Search("milk".to_string())),
            ("/s", BrowseCommand::Search(String::new())),
            ("/p 3", BrowseCommand::Page(3)),
            ("/new", BrowseCommand::OpenForm),
            ("/title Buy milk", BrowseCommand::SetTitle("Buy milk".to_string())),
            ("/content", BrowseCommand::SetContent(String::new())),
            ("/tag Shopping", BrowseCommand::SetTag("Shopping".to_string())),
            ("/save", BrowseCommand::Save),
            ("/cancel", BrowseCommand::Cancel),
            ("/q", BrowseCommand::Quit),
        ];
        for (line, expected) in cases {
            assert_eq!(BrowseCommand::parse(line), Ok(expected), "line {:?}", line);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            BrowseCommand::parse("/p two"),
            Err(CommandError::InvalidPage("two".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("/p"),
            Err(CommandError::MissingArgument("/p"))
        );
        assert_eq!(
            BrowseCommand::parse("/tag"),
            Err(CommandError::MissingArgument("/tag"))
        );
        assert_eq!(
            BrowseCommand::parse("/delete 3"),
            Err(CommandError::Unknown("/delete".to_string()))
        );
    }

    #[test]
    fn test_render_view_states() {
        let mut view = AppView {
            notes: vec![],
            total_pages: 1,
            show_pagination: false,
            loading: true,
            error: None,
            modal_open: false,
            search: String::new(),
            page: 1,
        };
        assert_eq!(render_view(&view), "loading...\n");

        view.loading = false;
        view.error = Some("Server error (500): down".to_string());
        assert_eq!(render_view(&view), "error: Server error (500): down\n(no notes)\n");

        view.error = None;
        view.notes = vec![sample_note("a", "Buy milk")];
        view.total_pages = 2;
        view.show_pagination = true;
        view.search = "milk".to_string();
        assert_eq!(
            render_view(&view),
            "search: milk\n  1. [Todo] Buy milk\npage 1 of 2\n"
        );
    }

    #[test]
    fn test_render_form_shows_errors() {
        let mut form = CreateForm::new();
        form.set_title("Hi");
        let _ = form.begin_submit();

        let rendered = render_form(&form);
        assert!(rendered.contains("title   Hi  <- Minimum 3 symbols"));
        assert!(rendered.contains("tag     Todo\n"));
    }

    #[tokio::test]
    async fn test_edit_without_form() {
        let mut shell = shell(&MockNoteService::new());
        let mut out = Vec::new();

        let keep_going = apply(&mut shell, BrowseCommand::SetTitle("x".to_string()), &mut out)
            .await
            .unwrap();
        assert!(keep_going);
        assert_eq!(String::from_utf8(out).unwrap(), "no form open (use /new)\n");
    }

    #[tokio::test]
    async fn test_scripted_create_session() {
        let service = MockNoteService::new().with_notes(1, "", 2, 1);
        let mut shell = shell(&service);
        let script = "/new\n/title Buy milk\n/tag Shopping\n/save\n/q\n/p 2\n";
        let mut out = Vec::new();

        run(&mut shell, script.as_bytes(), &mut out).await.unwrap();

        assert_eq!(
            service.create_calls(),
            vec![CreateNoteRequest {
                title: "Buy milk".to_string(),
                content: String::new(),
                tag: NoteTag::Shopping,
            }]
        );
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("created Buy milk (mock-0)"));
        assert!(!shell.view().modal_open);
        // initial load plus the refetch after create; "/p 2" came after quit
        assert_eq!(service.list_call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_search_refreshes_after_pause() {
        let service = MockNoteService::new()
            .with_notes(1, "", 3, 1)
            .with_notes(1, "gro", 1, 1);
        let mut shell = shell(&service);
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut out = Vec::new();

        let typist = async move {
            use tokio::io::AsyncWriteExt;
            writer.write_all(b"gro\n").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            writer.write_all(b"/q\n").await.unwrap();
        };
        let session = run(&mut shell, tokio::io::BufReader::new(reader), &mut out);
        let (result, ()) = tokio::join!(session, typist);
        result.unwrap();

        let searches: Vec<String> = service.list_calls().into_iter().map(|r| r.search).collect();
        assert_eq!(searches, vec!["".to_string(), "gro".to_string()]);
        assert_eq!(shell.view().notes.len(), 1);
    }
}
