//! Command-line surface of the `notepad` binary.

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;

use notepad_core::{defaults, NoteService, NoteTag};

use crate::browse::render_view;
use crate::form::{CreateForm, SubmitOutcome};
use crate::pipeline::NotesCache;
use crate::query_cache::QueryCacheConfig;
use crate::shell::AppShell;

#[derive(Parser, Debug)]
#[command(name = "notepad")]
#[command(about = "Search, page through, and create notes on a NoteHub server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of notes
    List(ListArgs),
    /// Validate and create a note
    Create(CreateArgs),
    /// Interactive search, paging, and note creation
    Browse,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(short, long, default_value_t = defaults::FIRST_PAGE)]
    pub page: u32,
    /// Search text (empty lists everything)
    #[arg(short, long, default_value = "")]
    pub search: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub content: String,
    /// One of Todo, Work, Personal, Meeting, Shopping
    #[arg(long, default_value_t = NoteTag::default().to_string())]
    pub tag: String,
}

/// Print one page. A failed fetch is reported as an error.
pub async fn run_list<W: Write>(
    service: Arc<dyn NoteService>,
    args: ListArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut shell = AppShell::new(service, QueryCacheConfig::default());
    shell.set_search(args.search);
    shell.flush_search();
    shell.set_page(args.page);
    shell.refresh().await;

    let view = shell.view();
    if let Some(error) = view.error {
        bail!("could not list notes: {}", error);
    }
    write!(out, "{}", render_view(&view))?;
    Ok(())
}

/// Validate locally, then create. Nothing is sent if validation fails.
pub async fn run_create<W: Write>(
    service: Arc<dyn NoteService>,
    args: CreateArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut form = CreateForm::new();
    form.set_title(args.title);
    form.set_content(args.content);
    form.set_tag(args.tag);

    match form.submit(service.as_ref(), &NotesCache::default()).await {
        SubmitOutcome::Created(note) => {
            writeln!(out, "created {} ({}) [{}]", note.title, note.id, note.tag)?;
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => bail!("invalid note: {}", errors),
        SubmitOutcome::Failed(message) => bail!("could not create note: {}", message),
        SubmitOutcome::Ignored => bail!("form was not ready to submit"),
    }
}
