// src/application/book_service.rs
use crate::domain::{Book, DomainError};
use tracing::debug;

pub trait BookRepository {
    fn list_books(&mut self) -> Result<Vec<Book>, DomainError>;

    /// Look a book up by its application id or its record id
    fn find_book(&mut self, id: &str) -> Result<Book, DomainError>;

    /// Store a new book and return it as the backend saw it
    fn create_book(&mut self, book: Book) -> Result<Book, DomainError>;

    fn update_book(&mut self, book: &Book) -> Result<Book, DomainError>;

    fn delete_book(&mut self, book: &Book) -> Result<(), DomainError>;
}

impl<T: BookRepository + ?Sized> BookRepository for &mut T {
    fn list_books(&mut self) -> Result<Vec<Book>, DomainError> {
        (**self).list_books()
    }

    fn find_book(&mut self, id: &str) -> Result<Book, DomainError> {
        (**self).find_book(id)
    }

    fn create_book(&mut self, book: Book) -> Result<Book, DomainError> {
        (**self).create_book(book)
    }

    fn update_book(&mut self, book: &Book) -> Result<Book, DomainError> {
        (**self).update_book(book)
    }

    fn delete_book(&mut self, book: &Book) -> Result<(), DomainError> {
        (**self).delete_book(book)
    }
}

pub struct BookService<R: BookRepository> {
    repository: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn list_books(&mut self) -> Result<Vec<Book>, DomainError> {
        self.repository.list_books()
    }

    pub fn find_book(&mut self, id: &str) -> Result<Book, DomainError> {
        self.repository.find_book(id)
    }

    pub fn create_book(&mut self, name: &str) -> Result<Book, DomainError> {
        let book = Book::new(name);
        debug!(book_id = %book.id, name, "Creating book");
        self.repository.create_book(book)
    }

    /// Rename `book` and return the stored result
    pub fn rename_book(&mut self, book: &Book, new_name: &str) -> Result<Book, DomainError> {
        let mut renamed = book.clone();
        renamed.name = new_name.to_string();
        renamed.touch();
        self.repository.update_book(&renamed)
    }

    pub fn delete_book(&mut self, book: &Book) -> Result<(), DomainError> {
        self.repository.delete_book(book)
    }
}
