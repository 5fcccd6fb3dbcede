use async_trait::async_trait;
use booktracker_db::Database;
use rusqlite::{params, OptionalExtension, Row};

use super::{BookRepository, RepositoryResult};
use crate::modules::books::models::Book;

const SELECT_COLUMNS: &str = "SELECT id, title, author, year, is_read FROM books";

/// SQLite-backed repository over the `books` table.
#[derive(Clone)]
pub struct SqliteBookRepository {
    db: Database,
}

impl SqliteBookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
        read: row.get(4)?,
    })
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn save(&self, book: Book) -> RepositoryResult<Book> {
        let saved = self
            .db
            .call(move |conn| {
                let id = match book.id {
                    None => {
                        conn.execute(
                            "INSERT INTO books (title, author, year, is_read) VALUES (?1, ?2, ?3, ?4)",
                            params![book.title, book.author, book.year, book.read],
                        )?;
                        conn.last_insert_rowid()
                    }
                    Some(id) => {
                        conn.execute(
                            r#"
                            INSERT INTO books (id, title, author, year, is_read)
                            VALUES (?1, ?2, ?3, ?4, ?5)
                            ON CONFLICT(id) DO UPDATE SET
                                title = excluded.title,
                                author = excluded.author,
                                year = excluded.year,
                                is_read = excluded.is_read
                            "#,
                            params![id, book.title, book.author, book.year, book.read],
                        )?;
                        id
                    }
                };
                Ok(Book {
                    id: Some(id),
                    ..book
                })
            })
            .await?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        let book = self
            .db
            .call(move |conn| {
                conn.query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], map_row)
                    .optional()
            })
            .await?;
        Ok(book)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        let books = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
                let rows = stmt.query_map([], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        Ok(books)
    }

    async fn find_by_read(&self, read: bool) -> RepositoryResult<Vec<Book>> {
        let books = self
            .db
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} WHERE is_read = ?1 ORDER BY id"))?;
                let rows = stmt.query_map([read], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        Ok(books)
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let exists = self
            .db
            .call(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1)",
                    [id],
                    |row| row.get(0),
                )
            })
            .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.db
            .call(move |conn| conn.execute("DELETE FROM books WHERE id = ?1", [id]))
            .await?;
        Ok(())
    }
}
