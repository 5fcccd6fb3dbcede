//! Book use-cases on top of a [`BookRepository`].
//!
//! The service is stateless apart from the repository handle. Operations that
//! need an existing book fail with [`BookError::NotFound`] before any write.

use std::sync::Arc;

use thiserror::Error;

use super::models::{Book, BookDto};
use super::repository::{BookRepository, RepositoryError};

pub type BookResult<T> = Result<T, BookError>;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Book with ID {id} not found")]
    NotFound { id: i64 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Persist a new book; any identifier on `dto` is discarded.
    pub async fn create(&self, dto: BookDto) -> BookResult<BookDto> {
        let book = Book {
            id: None,
            ..Book::from(dto)
        };
        let saved = self.repository.save(book).await?;
        tracing::info!(book_id = ?saved.id, "book created");
        Ok(saved.into())
    }

    pub async fn get_by_id(&self, id: i64) -> BookResult<BookDto> {
        tracing::debug!(book_id = id, "fetching book");
        self.repository
            .find_by_id(id)
            .await?
            .map(BookDto::from)
            .ok_or(BookError::NotFound { id })
    }

    /// Replace every mutable field of book `id` with the values from `dto`.
    pub async fn update(&self, id: i64, dto: BookDto) -> BookResult<BookDto> {
        let Some(mut book) = self.repository.find_by_id(id).await? else {
            return Err(BookError::NotFound { id });
        };

        book.title = dto.title;
        book.author = dto.author;
        book.year = dto.year;
        book.read = dto.read;

        let saved = self.repository.save(book).await?;
        tracing::info!(book_id = id, "book updated");
        Ok(saved.into())
    }

    /// Existence check and deletion are two separate repository calls; a
    /// concurrent delete of the same id can slip in between them.
    pub async fn delete(&self, id: i64) -> BookResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(BookError::NotFound { id });
        }
        self.repository.delete_by_id(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// `Some(flag)` keeps only books whose `read` equals `flag`; `None` keeps all.
    pub async fn list(&self, read: Option<bool>) -> BookResult<Vec<BookDto>> {
        let books = match read {
            Some(read) => self.repository.find_by_read(read).await?,
            None => self.repository.find_all().await?,
        };
        tracing::debug!(filter = ?read, count = books.len(), "books listed");
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}
