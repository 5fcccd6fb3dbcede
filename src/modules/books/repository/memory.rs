use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::modules::books::models::Book;

#[derive(Default)]
struct Shelf {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Map-backed repository; contents live as long as the process.
#[derive(Default)]
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn save(&self, mut book: Book) -> RepositoryResult<Book> {
        let mut shelf = self.shelf.write().await;
        let id = match book.id {
            Some(id) => {
                shelf.last_id = shelf.last_id.max(id);
                id
            }
            None => {
                shelf.last_id = shelf
                    .last_id
                    .checked_add(1)
                    .ok_or(RepositoryError::IdsExhausted)?;
                shelf.last_id
            }
        };
        book.id = Some(id);
        shelf.books.insert(id, book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        Ok(self.shelf.read().await.books.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        Ok(self.shelf.read().await.books.values().cloned().collect())
    }

    async fn find_by_read(&self, read: bool) -> RepositoryResult<Vec<Book>> {
        Ok(self
            .shelf
            .read()
            .await
            .books
            .values()
            .filter(|book| book.read == read)
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.shelf.read().await.books.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.shelf.write().await.books.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, read: bool) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            author: "Author".to_string(),
            year: 2001,
            read,
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let repo = InMemoryBookRepository::new();
        let first = repo.save(book("One", false)).await.unwrap();
        let second = repo.save(book("Two", true)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryBookRepository::new();
        repo.save(book("One", false)).await.unwrap();
        repo.delete_by_id(1).await.unwrap();

        let next = repo.save(book("Two", false)).await.unwrap();
        assert_eq!(next.id, Some(2));
        assert!(!repo.exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn save_with_id_overwrites() {
        let repo = InMemoryBookRepository::new();
        let mut saved = repo.save(book("One", false)).await.unwrap();
        saved.read = true;
        repo.save(saved.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(saved));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn filters_by_read_flag() {
        let repo = InMemoryBookRepository::new();
        repo.save(book("Read", true)).await.unwrap();
        repo.save(book("Unread", false)).await.unwrap();

        let read = repo.find_by_read(true).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].title, "Read");
        assert_eq!(repo.find_by_read(false).await.unwrap()[0].title, "Unread");
    }

    #[tokio::test]
    async fn saving_past_max_id_is_an_error() {
        let repo = InMemoryBookRepository::new();
        repo.save(Book {
            id: Some(i64::MAX),
            ..book("Last", false)
        })
        .await
        .unwrap();

        let err = repo.save(book("Overflow", false)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::IdsExhausted));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_missing_id_is_noop() {
        let repo = InMemoryBookRepository::new();
        repo.delete_by_id(42).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
