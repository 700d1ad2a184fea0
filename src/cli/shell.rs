// src/cli/shell.rs
//
// Interactive two-pane loop: the book list and the notes of the selected book
// are printed side by side, commands act on the current selection.
use crate::application::{BookRepository, NoteRepository, Workspace};
use crate::cli::prompt::confirm;
use crate::infrastructure::ContentEditor;
use crate::ports::TextPresenter;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

const HELP: &str = "\
Commands:
  ls                 show books and notes
  book N             select book N
  note N             select note N and print it
  show               print the selected note
  new-book [NAME]    create a book
  rename NAME        rename the selected book
  delete-book        delete the selected book
  new-note [TITLE]   create a note in the selected book
  title TEXT         change the selected note's title
  write TEXT         replace the selected note's content
  edit               edit the selected note's content in $EDITOR
  save               save the selected note
  delete-note        delete the selected note
  reload             fetch everything again
  quit               leave the shell";

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, E> {
    workspace: Workspace<R>,
    editor: E,
    presenter: TextPresenter,
}

impl<R: BookRepository + NoteRepository, E: ContentEditor> Shell<R, E> {
    pub fn new(repository: R, editor: E) -> Self {
        Self {
            workspace: Workspace::new(repository),
            editor,
            presenter: TextPresenter::new(),
        }
    }

    pub fn workspace(&self) -> &Workspace<R> {
        &self.workspace
    }

    /// Run until `quit` or end of input. Command failures are reported and
    /// the loop carries on; only I/O errors on the terminal end it.
    pub fn run<I: BufRead, O: Write>(&mut self, mut input: I, output: &mut O) -> Result<()> {
        writeln!(output, "notex shell - type `help` for commands")?;
        match self.workspace.load_books().context("Failed to load books") {
            Ok(()) => self.print_panes(output)?,
            Err(e) => writeln!(output, "Error: {e:#}")?,
        }

        loop {
            write!(output, "notex> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (line, ""),
            };
            debug!(command, rest, "Shell command");

            match self.execute(command, rest, &mut input, output) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(output, "Error: {e:#}")?,
            }
        }
        Ok(())
    }

    fn execute<I: BufRead, O: Write>(
        &mut self,
        command: &str,
        rest: &str,
        input: &mut I,
        output: &mut O,
    ) -> Result<Flow> {
        match command {
            "help" | "?" => writeln!(output, "{HELP}")?,
            "ls" | "books" => self.print_panes(output)?,
            "book" => {
                let index = parse_index(rest, self.workspace.books().len(), "book")?;
                let id = self.workspace.books()[index].id.clone();
                self.workspace.select_book(&id).context("Failed to load notes")?;
                self.print_panes(output)?;
            }
            "note" => {
                let index = parse_index(rest, self.workspace.notes().len(), "note")?;
                let id = self.workspace.notes()[index].id.clone();
                self.workspace.select_note(&id)?;
                self.print_selected_note(output)?;
            }
            "show" => self.print_selected_note(output)?,
            "new-book" => {
                self.workspace
                    .create_book(non_empty(rest))
                    .context("Failed to create book")?;
                self.print_panes(output)?;
            }
            "rename" => {
                if self
                    .workspace
                    .rename_selected_book(rest)
                    .context("Failed to rename book")?
                {
                    self.print_panes(output)?;
                } else {
                    writeln!(output, "Nothing renamed.")?;
                }
            }
            "delete-book" => {
                let Some(book) = self.workspace.selected_book() else {
                    bail!("No book selected");
                };
                let question = format!("Delete '{}'?", book.name);
                if confirm(input, output, &question)? {
                    let removed = self
                        .workspace
                        .delete_selected_book()
                        .context("Failed to delete book")?;
                    writeln!(output, "Deleted '{}'.", removed.name)?;
                    self.workspace.load_notes().context("Failed to load notes")?;
                    self.print_panes(output)?;
                }
            }
            "new-note" => {
                self.workspace
                    .create_note(non_empty(rest))
                    .context("Failed to create note")?;
                self.print_panes(output)?;
            }
            "title" => {
                if rest.is_empty() {
                    bail!("Usage: title TEXT");
                }
                self.workspace.set_title(rest)?;
                writeln!(output, "Title changed; `save` to keep it.")?;
            }
            "write" => {
                self.workspace.set_content(rest)?;
                writeln!(output, "Content changed; `save` to keep it.")?;
            }
            "edit" => {
                let current = self
                    .workspace
                    .selected_note()
                    .map(|n| n.content.clone())
                    .context("No note selected")?;
                let edited = self.editor.edit(&current)?;
                if edited == current {
                    writeln!(output, "No changes.")?;
                } else {
                    self.workspace.set_content(&edited)?;
                    writeln!(output, "Content changed; `save` to keep it.")?;
                }
            }
            "save" => {
                let note = self
                    .workspace
                    .save_selected_note()
                    .context("Failed to save note")?;
                writeln!(output, "Saved '{}'.", note.title)?;
            }
            "delete-note" => {
                let Some(note) = self.workspace.selected_note() else {
                    bail!("No note selected");
                };
                let question = format!("Delete note '{}'?", note.title);
                if confirm(input, output, &question)? {
                    self.workspace
                        .delete_selected_note()
                        .context("Failed to delete note")?;
                    self.print_panes(output)?;
                }
            }
            "reload" => {
                self.workspace.load_books().context("Failed to load books")?;
                self.print_panes(output)?;
            }
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => writeln!(output, "Unknown command '{other}'. Type `help` for commands.")?,
        }
        Ok(Flow::Continue)
    }

    fn print_panes<O: Write>(&self, output: &mut O) -> Result<()> {
        let text = self.presenter.render_panes(
            self.workspace.books(),
            self.workspace.selected_book().map(|b| b.id.as_str()),
            self.workspace.notes(),
            self.workspace.selected_note().map(|n| n.id.as_str()),
        );
        write!(output, "{text}")?;
        Ok(())
    }

    fn print_selected_note<O: Write>(&self, output: &mut O) -> Result<()> {
        match self.workspace.selected_note() {
            Some(note) => write!(output, "{}", self.presenter.render_note(note))?,
            None => writeln!(output, "No note selected.")?,
        }
        Ok(())
    }
}

fn non_empty(text: &str) -> Option<&str> {
    Some(text).filter(|t| !t.is_empty())
}

/// Turn a 1-based position typed by the user into an index
fn parse_index(text: &str, len: usize, what: &str) -> Result<usize> {
    let position: usize = text
        .parse()
        .with_context(|| format!("Usage: {what} N (a number from the list)"))?;
    if position == 0 || position > len {
        bail!("There is no {what} {position}");
    }
    Ok(position - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Book, Note};
    use crate::util::testing::MockNotebookRepository;
    use std::io::Cursor;

    struct ScriptedEditor(&'static str);

    impl ContentEditor for ScriptedEditor {
        fn edit(&mut self, _initial: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn run_script(
        mock: MockNotebookRepository,
        script: &str,
    ) -> (Shell<MockNotebookRepository, ScriptedEditor>, String) {
        let mut shell = Shell::new(mock, ScriptedEditor("edited body"));
        let mut output = Vec::new();
        shell
            .run(Cursor::new(script.as_bytes().to_vec()), &mut output)
            .expect("Shell should run");
        (shell, String::from_utf8(output).unwrap())
    }

    #[test]
    fn given_index_out_of_range_when_parsing_then_errors() {
        assert_eq!(parse_index("2", 3, "book").unwrap(), 1);
        assert!(parse_index("0", 3, "book").is_err());
        assert!(parse_index("4", 3, "book").is_err());
        assert!(parse_index("x", 3, "book").is_err());
    }

    #[test]
    fn given_books_when_starting_then_prints_panes() {
        let mock = MockNotebookRepository::builder().with_book(Book::new("Journal")).build();

        let (_, output) = run_script(mock, "quit\n");

        assert!(output.contains("BOOKS"));
        assert!(output.contains(">  1. Journal"));
    }

    #[test]
    fn given_new_book_and_note_commands_when_running_then_creates_and_selects_them() {
        let (shell, output) = run_script(
            MockNotebookRepository::builder().build(),
            "new-book Travel\nnew-note Packing\nwrite passport\nsave\n",
        );

        let workspace = shell.workspace();
        assert_eq!(workspace.selected_book().unwrap().name, "Travel");
        let note = workspace.selected_note().unwrap();
        assert_eq!(note.title, "Packing");
        assert_eq!(note.content, "passport");
        assert!(output.contains("Saved 'Packing'."));
    }

    #[test]
    fn given_edit_command_when_running_then_uses_editor_output() {
        let book = Book::new("Book");
        let note = Note::new(book.id.clone(), "Draft");
        let mock = MockNotebookRepository::builder().with_book(book).with_note(note).build();

        let (shell, _) = run_script(mock, "edit\n");

        assert_eq!(shell.workspace().selected_note().unwrap().content, "edited body");
    }

    #[test]
    fn given_declined_confirmation_when_deleting_book_then_keeps_it() {
        let mock = MockNotebookRepository::builder().with_book(Book::new("Keep")).build();

        let (shell, output) = run_script(mock, "delete-book\nn\n");

        assert!(output.contains("Delete 'Keep'? [y/N]"));
        assert_eq!(shell.workspace().books().len(), 1);
    }

    #[test]
    fn given_confirmed_delete_when_deleting_book_then_removes_it() {
        let mock = MockNotebookRepository::builder().with_book(Book::new("Drop")).build();

        let (shell, _) = run_script(mock, "delete-book\ny\n");

        assert!(shell.workspace().books().is_empty());
    }

    #[test]
    fn given_note_reload_fails_when_deleting_book_then_reports_load_error_only() {
        let keep = Book::new("Keep");
        let mut drop = Book::new("Drop");
        drop.updated_at = keep.updated_at + chrono::Duration::minutes(1);
        let mock = MockNotebookRepository::builder()
            .with_book(drop)
            .with_book(keep)
            .with_note_listing_limit(1)
            .build();

        let (shell, output) = run_script(mock, "delete-book\ny\n");

        assert!(output.contains("Deleted 'Drop'."));
        assert!(output.contains("Error: Failed to load notes: Airtable returned 503"));
        assert!(!output.contains("Failed to delete book"));
        assert_eq!(shell.workspace().books().len(), 1);
    }

    #[test]
    fn given_failing_command_when_running_then_reports_and_continues() {
        let (_, output) = run_script(
            MockNotebookRepository::builder().build(),
            "new-note Orphan\nbogus\nquit\n",
        );

        assert!(output.contains("Error: Failed to create note: No book selected"));
        assert!(output.contains("Unknown command 'bogus'"));
    }

    #[test]
    fn given_backend_failure_when_starting_then_reports_load_error() {
        let mock = MockNotebookRepository::builder().with_failure("NOT_AUTHORIZED").build();

        let (_, output) = run_script(mock, "");

        assert!(output.contains("Error: Failed to load books: Airtable returned 403: NOT_AUTHORIZED"));
    }
}
