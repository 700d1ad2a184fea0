// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{
    AirtableConnector, BookRepository, BookService, Connection, ConnectionStatus,
    NoteRepository, NoteService, SettingsRepository,
};
use crate::cli::args::{Args, BookCommand, Command, EditArgs, NoteCommand};
use crate::cli::prompt::confirm;
use crate::cli::shell::Shell;
use crate::constants::{DEFAULT_BOOK_NAME, DEFAULT_NOTE_TITLE};
use crate::domain::{AppSettings, Book, Note};
use crate::infrastructure::{AirtableClient, ContentEditor, ExternalEditor, SettingsStore};
use crate::ports::TextPresenter;
use crate::util::text::mask_secret;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(settings = ?args.settings, verbose = args.verbose, "Starting notex");

    let store = match args.settings {
        Some(path) => {
            debug!(?path, "Using provided settings path");
            SettingsStore::new(path)
        }
        None => SettingsStore::at_default_location()?,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    match args.command {
        Command::Configure { token, base } => configure(store, &token, base.as_deref(), &mut output),
        Command::Status => status(store, &mut output),
        Command::Book(command) => {
            run_book_command(connect(store)?, command, &mut input, &mut output)
        }
        Command::Note(command) => {
            let mut editor = ExternalEditor::new();
            run_note_command(connect(store)?, command, &mut editor, &mut input, &mut output)
        }
        Command::Shell => {
            let mut shell = Shell::new(connect(store)?, ExternalEditor::new());
            shell.run(input, &mut output)
        }
    }
}

/// Restore the saved connection, failing with a hint when there is none
pub fn connect(store: SettingsStore) -> Result<AirtableClient> {
    let settings = store.load()?;
    let mut connection = Connection::new(store, AirtableClient::from_settings(&settings));

    match connection.restore().context("Failed to connect to Airtable")? {
        ConnectionStatus::Connected => Ok(connection.into_connector()),
        ConnectionStatus::Disconnected => bail!(
            "Airtable is not configured. Run `notex configure --token <TOKEN>` first."
        ),
    }
}

/// Validate `token`, resolve the base and save both
pub fn configure<O: Write>(
    store: SettingsStore,
    token: &str,
    base_id: Option<&str>,
    output: &mut O,
) -> Result<()> {
    let path = store.path().to_path_buf();
    let settings = store.load().unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable settings");
        AppSettings::default()
    });
    let mut connection = Connection::new(store, AirtableClient::from_settings(&settings));

    let saved = connection
        .configure(token, base_id)
        .context("Failed to configure Airtable")?;

    info!(path = %path.display(), "Settings saved");
    writeln!(
        output,
        "Saved to {}. Using base {}.",
        path.display(),
        saved.airtable_base_id.as_deref().unwrap_or("(none)")
    )?;
    Ok(())
}

pub fn status<O: Write>(store: SettingsStore, output: &mut O) -> Result<()> {
    let path = store.path().to_path_buf();
    let settings = store.load()?;
    writeln!(output, "Settings: {}", path.display())?;

    let Some(api_key) = settings.api_key().map(mask_secret) else {
        writeln!(output, "Status:   {}", ConnectionStatus::Disconnected)?;
        writeln!(output, "Run `notex configure --token <TOKEN>` to connect.")?;
        return Ok(());
    };

    let client = AirtableClient::from_settings(&settings);
    writeln!(output, "Endpoint: {}", client.endpoint())?;
    writeln!(output, "Token:    {api_key}")?;

    let mut connection = Connection::new(store, client);
    let state = connection.restore().context("Failed to connect to Airtable")?;
    writeln!(output, "Status:   {state}")?;
    writeln!(
        output,
        "Base:     {}",
        connection.connector().base_id().unwrap_or("(none)")
    )?;
    Ok(())
}

pub fn run_book_command<R, I, O>(
    repository: R,
    command: BookCommand,
    input: &mut I,
    output: &mut O,
) -> Result<()>
where
    R: BookRepository,
    I: BufRead,
    O: Write,
{
    let mut books = BookService::new(repository);
    let presenter = TextPresenter::new();

    match command {
        BookCommand::List { json } => {
            let mut list = books.list_books().context("Failed to load books")?;
            Book::sort_newest_first(&mut list);
            if json {
                writeln!(output, "{}", serde_json::to_string_pretty(&list)?)?;
            } else if list.is_empty() {
                writeln!(output, "No books yet.")?;
            } else {
                write!(output, "{}", presenter.book_rows(&list))?;
            }
        }
        BookCommand::Create { name } => {
            let name = name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_BOOK_NAME);
            let created = books.create_book(name).context("Failed to create book")?;
            writeln!(output, "Created book '{}' ({})", created.name, created.id)?;
        }
        BookCommand::Rename { book, name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("The new name must not be blank");
            }
            let current = books.find_book(&book).context("Failed to rename book")?;
            let renamed = books
                .rename_book(&current, name)
                .context("Failed to rename book")?;
            writeln!(output, "Renamed '{}' to '{}'", current.name, renamed.name)?;
        }
        BookCommand::Delete { book, yes } => {
            let target = books.find_book(&book).context("Failed to delete book")?;
            let question = format!("Delete '{}'?", target.name);
            if !yes && !confirm(input, output, &question)? {
                writeln!(output, "Cancelled.")?;
                return Ok(());
            }
            books.delete_book(&target).context("Failed to delete book")?;
            writeln!(output, "Deleted book '{}'", target.name)?;
        }
    }
    Ok(())
}

pub fn run_note_command<R, E, I, O>(
    mut repository: R,
    command: NoteCommand,
    editor: &mut E,
    input: &mut I,
    output: &mut O,
) -> Result<()>
where
    R: BookRepository + NoteRepository,
    E: ContentEditor,
    I: BufRead,
    O: Write,
{
    let presenter = TextPresenter::new();

    match command {
        NoteCommand::List { book, search, json } => {
            let owner = BookService::new(&mut repository)
                .find_book(&book)
                .context("Failed to load notes")?;
            let mut notes = NoteService::new(&mut repository)
                .list_notes(Some(&owner.id), search.as_deref())
                .context("Failed to load notes")?;
            Note::sort_newest_first(&mut notes);
            if json {
                writeln!(output, "{}", serde_json::to_string_pretty(&notes)?)?;
            } else if notes.is_empty() {
                writeln!(output, "No notes in '{}'.", owner.name)?;
            } else {
                write!(output, "{}", presenter.note_rows(&notes))?;
            }
        }
        NoteCommand::Create { book, title } => {
            let owner = BookService::new(&mut repository)
                .find_book(&book)
                .context("Failed to create note")?;
            let title = title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_NOTE_TITLE);
            let created = NoteService::new(&mut repository)
                .create_note(&owner.id, title)
                .context("Failed to create note")?;
            writeln!(output, "Created note '{}' ({})", created.title, created.id)?;
        }
        NoteCommand::Show { note, json } => {
            let found = NoteService::new(&mut repository)
                .find_note(&note)
                .context("Failed to load note")?;
            if json {
                writeln!(output, "{}", serde_json::to_string_pretty(&found)?)?;
            } else {
                write!(output, "{}", presenter.render_note(&found))?;
            }
        }
        NoteCommand::Edit(args) => {
            let mut notes = NoteService::new(&mut repository);
            let mut note = notes.find_note(&args.note).context("Failed to save note")?;
            if !apply_edits(&mut note, &args, editor, input)? {
                bail!("Nothing to change: pass --title, --content, --file or --editor");
            }
            let saved = notes.update_note(&note).context("Failed to save note")?;
            writeln!(output, "Saved note '{}' ({})", saved.title, saved.id)?;
        }
        NoteCommand::Delete { note, yes } => {
            let mut notes = NoteService::new(&mut repository);
            let target = notes.find_note(&note).context("Failed to delete note")?;
            let question = format!("Delete note '{}'?", target.title);
            if !yes && !confirm(input, output, &question)? {
                writeln!(output, "Cancelled.")?;
                return Ok(());
            }
            notes.delete_note(&target).context("Failed to delete note")?;
            writeln!(output, "Deleted note '{}'", target.title)?;
        }
    }
    Ok(())
}

/// Apply the requested edits to `note`, returning whether anything was requested
fn apply_edits<E: ContentEditor, I: BufRead>(
    note: &mut Note,
    args: &EditArgs,
    editor: &mut E,
    input: &mut I,
) -> Result<bool> {
    let mut changed = false;

    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            bail!("The title must not be blank");
        }
        note.title = title.to_string();
        changed = true;
    }

    let content = if let Some(content) = &args.content {
        Some(content.clone())
    } else if let Some(path) = &args.file {
        if path.as_os_str() == "-" {
            let mut buffer = String::new();
            input
                .read_to_string(&mut buffer)
                .context("Failed to read content from stdin")?;
            Some(buffer)
        } else {
            Some(
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        }
    } else if args.editor {
        Some(editor.edit(&note.content)?)
    } else {
        None
    };

    if let Some(content) = content {
        note.content = content;
        changed = true;
    }
    Ok(changed)
}
