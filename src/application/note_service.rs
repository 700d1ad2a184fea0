// src/application/note_service.rs
use crate::domain::{DomainError, Note};
use tracing::debug;

pub trait NoteRepository {
    /// List notes, restricted to one book when `book_id` is given
    fn list_notes(&mut self, book_id: Option<&str>) -> Result<Vec<Note>, DomainError>;

    fn find_note(&mut self, id: &str) -> Result<Note, DomainError>;

    fn create_note(&mut self, note: Note) -> Result<Note, DomainError>;

    fn update_note(&mut self, note: &Note) -> Result<Note, DomainError>;

    fn delete_note(&mut self, note: &Note) -> Result<(), DomainError>;
}

impl<T: NoteRepository + ?Sized> NoteRepository for &mut T {
    fn list_notes(&mut self, book_id: Option<&str>) -> Result<Vec<Note>, DomainError> {
        (**self).list_notes(book_id)
    }

    fn find_note(&mut self, id: &str) -> Result<Note, DomainError> {
        (**self).find_note(id)
    }

    fn create_note(&mut self, note: Note) -> Result<Note, DomainError> {
        (**self).create_note(note)
    }

    fn update_note(&mut self, note: &Note) -> Result<Note, DomainError> {
        (**self).update_note(note)
    }

    fn delete_note(&mut self, note: &Note) -> Result<(), DomainError> {
        (**self).delete_note(note)
    }
}

pub struct NoteService<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// List notes of a book, or of all books
    ///
    /// # Arguments
    /// * `book_id` - Optional owning book
    /// * `search_query` - Optional term matched against title and content
    pub fn list_notes(
        &mut self,
        book_id: Option<&str>,
        search_query: Option<&str>,
    ) -> Result<Vec<Note>, DomainError> {
        let notes = self.repository.list_notes(book_id)?;
        Ok(match search_query {
            None => notes,
            Some(query) => notes.into_iter().filter(|n| n.matches(query)).collect(),
        })
    }

    pub fn find_note(&mut self, id: &str) -> Result<Note, DomainError> {
        self.repository.find_note(id)
    }

    pub fn create_note(&mut self, book_id: &str, title: &str) -> Result<Note, DomainError> {
        let note = Note::new(book_id, title);
        debug!(note_id = %note.id, book_id, "Creating note");
        self.repository.create_note(note)
    }

    pub fn update_note(&mut self, note: &Note) -> Result<Note, DomainError> {
        let mut note = note.clone();
        note.touch();
        self.repository.update_note(&note)
    }

    pub fn delete_note(&mut self, note: &Note) -> Result<(), DomainError> {
        self.repository.delete_note(note)
    }
}
