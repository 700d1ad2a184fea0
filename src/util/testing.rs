// src/util/testing.rs

use anyhow::Result;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{BookRepository, NoteRepository};
use crate::domain::{Book, DomainError, Note};

/// In-memory stand-in for the Airtable backend
///
/// Stores books and notes in insertion order and hands out `rec…` record ids
/// the way Airtable does, so use cases can be tested without a network.
///
/// # Examples
///
/// ```
/// use notex::application::BookRepository;
/// use notex::domain::Book;
/// use notex::util::testing::MockNotebookRepository;
///
/// let mut mock = MockNotebookRepository::builder()
///     .with_book(Book::new("Journal"))
///     .build();
/// assert_eq!(mock.list_books().unwrap().len(), 1);
/// ```
pub struct MockNotebookRepository {
    books: Vec<Book>,
    notes: Vec<Note>,
    failure: Option<String>,
    note_listings_left: Option<usize>,
    next_record: usize,
}

impl MockNotebookRepository {
    pub fn builder() -> MockNotebookRepositoryBuilder {
        MockNotebookRepositoryBuilder::new()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        match &self.failure {
            Some(message) => Err(DomainError::Api {
                status: 403,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn next_record_id(&mut self) -> String {
        self.next_record += 1;
        format!("rec{:05}", self.next_record)
    }
}

fn same_record(id: &str, record_id: &Option<String>, candidate: &str) -> bool {
    id == candidate || record_id.as_deref() == Some(candidate)
}

impl BookRepository for MockNotebookRepository {
    fn list_books(&mut self) -> Result<Vec<Book>, DomainError> {
        self.check_failure()?;
        Ok(self.books.clone())
    }

    fn find_book(&mut self, id: &str) -> Result<Book, DomainError> {
        self.check_failure()?;
        self.books
            .iter()
            .find(|b| same_record(&b.id, &b.record_id, id))
            .cloned()
            .ok_or_else(|| DomainError::BookNotFound(id.to_string()))
    }

    fn create_book(&mut self, mut book: Book) -> Result<Book, DomainError> {
        self.check_failure()?;
        book.record_id = Some(self.next_record_id());
        self.books.push(book.clone());
        Ok(book)
    }

    fn update_book(&mut self, book: &Book) -> Result<Book, DomainError> {
        self.check_failure()?;
        let stored = self
            .books
            .iter_mut()
            .find(|b| b.id == book.id)
            .ok_or_else(|| DomainError::BookNotFound(book.id.clone()))?;
        let record_id = stored.record_id.clone();
        *stored = book.clone();
        stored.record_id = record_id;
        Ok(stored.clone())
    }

    fn delete_book(&mut self, book: &Book) -> Result<(), DomainError> {
        self.check_failure()?;
        let index = self
            .books
            .iter()
            .position(|b| b.id == book.id)
            .ok_or_else(|| DomainError::BookNotFound(book.id.clone()))?;
        self.books.remove(index);
        Ok(())
    }
}

impl NoteRepository for MockNotebookRepository {
    fn list_notes(&mut self, book_id: Option<&str>) -> Result<Vec<Note>, DomainError> {
        self.check_failure()?;
        if let Some(left) = self.note_listings_left.as_mut() {
            if *left == 0 {
                return Err(DomainError::Api {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            *left -= 1;
        }
        Ok(self
            .notes
            .iter()
            .filter(|n| book_id.map_or(true, |id| n.book_id == id))
            .cloned()
            .collect())
    }

    fn find_note(&mut self, id: &str) -> Result<Note, DomainError> {
        self.check_failure()?;
        self.notes
            .iter()
            .find(|n| same_record(&n.id, &n.record_id, id))
            .cloned()
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))
    }

    fn create_note(&mut self, mut note: Note) -> Result<Note, DomainError> {
        self.check_failure()?;
        note.record_id = Some(self.next_record_id());
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(&mut self, note: &Note) -> Result<Note, DomainError> {
        self.check_failure()?;
        let stored = self
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| DomainError::NoteNotFound(note.id.clone()))?;
        let record_id = stored.record_id.clone();
        *stored = note.clone();
        stored.record_id = record_id;
        Ok(stored.clone())
    }

    fn delete_note(&mut self, note: &Note) -> Result<(), DomainError> {
        self.check_failure()?;
        let index = self
            .notes
            .iter()
            .position(|n| n.id == note.id)
            .ok_or_else(|| DomainError::NoteNotFound(note.id.clone()))?;
        self.notes.remove(index);
        Ok(())
    }
}

/// Builder for MockNotebookRepository
///
/// Provides a fluent interface for seeding the mock.
pub struct MockNotebookRepositoryBuilder {
    books: Vec<Book>,
    notes: Vec<Note>,
    failure: Option<String>,
    note_listings_left: Option<usize>,
}

impl MockNotebookRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            books: vec![],
            notes: vec![],
            failure: None,
            note_listings_left: None,
        }
    }

    /// Seed a stored book; a record id is assigned if it has none
    pub fn with_book(mut self, book: Book) -> Self {
        self.books.push(book);
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Make every call fail the way Airtable rejects a request (HTTP 403)
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Let `list_notes` succeed `count` times, then answer 503
    pub fn with_note_listing_limit(mut self, count: usize) -> Self {
        self.note_listings_left = Some(count);
        self
    }

    pub fn build(self) -> MockNotebookRepository {
        let mut mock = MockNotebookRepository {
            books: vec![],
            notes: vec![],
            failure: self.failure,
            note_listings_left: self.note_listings_left,
            next_record: 0,
        };
        for mut book in self.books {
            if book.record_id.is_none() {
                book.record_id = Some(mock.next_record_id());
            }
            mock.books.push(book);
        }
        for mut note in self.notes {
            if note.record_id.is_none() {
                note.record_id = Some(mock.next_record_id());
            }
            mock.notes.push(note);
        }
        mock
    }
}

impl Default for MockNotebookRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["ureq", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
