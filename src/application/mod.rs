// src/application/mod.rs
pub mod book_service;
pub mod connection;
pub mod note_service;
pub mod workspace;

pub use book_service::{BookRepository, BookService};
pub use connection::{AirtableConnector, Connection, ConnectionStatus, SettingsRepository};
pub use note_service::{NoteRepository, NoteService};
pub use workspace::Workspace;
