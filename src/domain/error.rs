// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Book not found: {0}")]
    BookNotFound(String),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("No {0} selected")]
    NothingSelected(&'static str),
    #[error("Airtable is not configured: {0}")]
    NotConfigured(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Connection(String),
    #[error("Airtable returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected response from Airtable: {0}")]
    Decode(String),
    #[error("Settings error: {0}")]
    Settings(String),
}
