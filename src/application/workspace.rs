// src/application/workspace.rs
//
// State behind the two-pane view: the book list on the left, the notes of the
// selected book on the right. Both lists are kept newest-first.
use crate::application::{BookRepository, BookService, NoteRepository, NoteService};
use crate::constants::{DEFAULT_BOOK_NAME, DEFAULT_NOTE_TITLE};
use crate::domain::{Book, DomainError, Note};
use tracing::{debug, instrument};

pub struct Workspace<R> {
    repository: R,
    books: Vec<Book>,
    notes: Vec<Note>,
    selected_book: Option<String>,
    selected_note: Option<String>,
}

impl<R: BookRepository + NoteRepository> Workspace<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            books: Vec::new(),
            notes: Vec::new(),
            selected_book: None,
            selected_note: None,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_book(&self) -> Option<&Book> {
        let id = self.selected_book.as_deref()?;
        self.books.iter().find(|b| b.id == id)
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected_note.as_deref()?;
        self.notes.iter().find(|n| n.id == id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_books(&mut self) -> Result<(), DomainError> {
        let mut books = BookService::new(&mut self.repository).list_books()?;
        Book::sort_newest_first(&mut books);
        debug!(count = books.len(), "Loaded books");

        self.books = books;
        self.selected_book = self.books.first().map(|b| b.id.clone());
        self.load_notes()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_notes(&mut self) -> Result<(), DomainError> {
        self.notes.clear();
        self.selected_note = None;
        let Some(book_id) = self.selected_book.clone() else {
            return Ok(());
        };

        let mut notes = NoteService::new(&mut self.repository).list_notes(Some(&book_id), None)?;
        Note::sort_newest_first(&mut notes);
        debug!(count = notes.len(), %book_id, "Loaded notes");

        self.notes = notes;
        self.selected_note = self.notes.first().map(|n| n.id.clone());
        Ok(())
    }

    pub fn select_book(&mut self, id: &str) -> Result<(), DomainError> {
        if !self.books.iter().any(|b| b.id == id) {
            return Err(DomainError::BookNotFound(id.to_string()));
        }
        if self.selected_book.as_deref() == Some(id) {
            return Ok(());
        }
        self.selected_book = Some(id.to_string());
        self.load_notes()
    }

    pub fn select_note(&mut self, id: &str) -> Result<(), DomainError> {
        if !self.notes.iter().any(|n| n.id == id) {
            return Err(DomainError::NoteNotFound(id.to_string()));
        }
        self.selected_note = Some(id.to_string());
        Ok(())
    }

    /// Create a book at the top of the list and select it
    pub fn create_book(&mut self, name: Option<&str>) -> Result<&Book, DomainError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_BOOK_NAME);
        let created = BookService::new(&mut self.repository).create_book(name)?;
        let id = created.id.clone();
        self.books.insert(0, created);
        self.selected_book = Some(id);
        self.load_notes()?;
        Ok(&self.books[0])
    }

    /// Rename the selected book. A blank name leaves it untouched and
    /// returns `false`.
    pub fn rename_selected_book(&mut self, new_name: &str) -> Result<bool, DomainError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(false);
        }
        let index = self.selected_book_index()?;
        let updated =
            BookService::new(&mut self.repository).rename_book(&self.books[index], new_name)?;
        self.selected_book = Some(updated.id.clone());
        self.books[index] = updated;
        Ok(true)
    }

    /// Delete the selected book and select the first remaining one. Its notes
    /// are not fetched here: call `load_notes` afterwards.
    pub fn delete_selected_book(&mut self) -> Result<Book, DomainError> {
        let index = self.selected_book_index()?;
        BookService::new(&mut self.repository).delete_book(&self.books[index])?;
        let removed = self.books.remove(index);
        self.selected_book = self.books.first().map(|b| b.id.clone());
        self.notes.clear();
        self.selected_note = None;
        Ok(removed)
    }

    /// Create a note in the selected book at the top of the list and select it
    pub fn create_note(&mut self, title: Option<&str>) -> Result<&Note, DomainError> {
        let book_id = self
            .selected_book()
            .map(|b| b.id.clone())
            .ok_or(DomainError::NothingSelected("book"))?;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_NOTE_TITLE);
        let created = NoteService::new(&mut self.repository).create_note(&book_id, title)?;
        self.selected_note = Some(created.id.clone());
        self.notes.insert(0, created);
        Ok(&self.notes[0])
    }

    /// Change the selected note's title locally; `save_selected_note` persists it
    pub fn set_title(&mut self, title: &str) -> Result<(), DomainError> {
        let index = self.selected_note_index()?;
        self.notes[index].title = title.to_string();
        Ok(())
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), DomainError> {
        let index = self.selected_note_index()?;
        self.notes[index].content = content.to_string();
        Ok(())
    }

    pub fn save_selected_note(&mut self) -> Result<&Note, DomainError> {
        let index = self.selected_note_index()?;
        let updated = NoteService::new(&mut self.repository).update_note(&self.notes[index])?;
        self.selected_note = Some(updated.id.clone());
        self.notes[index] = updated;
        Ok(&self.notes[index])
    }

    pub fn delete_selected_note(&mut self) -> Result<Note, DomainError> {
        let index = self.selected_note_index()?;
        NoteService::new(&mut self.repository).delete_note(&self.notes[index])?;
        let removed = self.notes.remove(index);
        self.selected_note = self.notes.first().map(|n| n.id.clone());
        Ok(removed)
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    fn selected_book_index(&self) -> Result<usize, DomainError> {
        self.selected_book
            .as_deref()
            .and_then(|id| self.books.iter().position(|b| b.id == id))
            .ok_or(DomainError::NothingSelected("book"))
    }

    fn selected_note_index(&self) -> Result<usize, DomainError> {
        self.selected_note
            .as_deref()
            .and_then(|id| self.notes.iter().position(|n| n.id == id))
            .ok_or(DomainError::NothingSelected("note"))
    }
}
