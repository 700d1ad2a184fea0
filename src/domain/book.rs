// src/domain/book.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Book {
    pub id: String,
    /// Airtable record id, known once the book has been stored or fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// A fresh, not yet stored book with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            record_id: None,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Most recently updated first
    pub fn sort_newest_first(books: &mut [Book]) {
        books.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }
}
