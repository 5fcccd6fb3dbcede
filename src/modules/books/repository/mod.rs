//! Persistence contract for books and its storage backends.

mod memory;
mod sqlite;

use async_trait::async_trait;
use booktracker_db::DbError;
use thiserror::Error;

use super::models::Book;

pub use memory::InMemoryBookRepository;
pub use sqlite::SqliteBookRepository;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("no identifiers left to assign")]
    IdsExhausted,
}

/// Storage operations the book service relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert when `book.id` is `None`, otherwise overwrite the stored row.
    /// Returns the book with its identifier populated.
    async fn save(&self, book: Book) -> RepositoryResult<Book>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Book>>;

    async fn find_by_read(&self, read: bool) -> RepositoryResult<Vec<Book>>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    /// Removing an absent id is a no-op.
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
}
