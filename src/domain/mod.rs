// src/domain/mod.rs
pub mod book;
pub mod error;
pub mod note;
pub mod settings;

pub use book::Book;
pub use error::DomainError;
pub use note::Note;
pub use settings::AppSettings;
