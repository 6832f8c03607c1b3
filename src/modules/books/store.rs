//! Persistence for books.
//!
//! [`BookStore`] is implemented by [`SqliteBookStore`] for the running
//! service and by [`InMemoryBookStore`] for tests that do not need a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

use super::models::{Book, BookPayload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row-level access to the `books` table.
///
/// Absent rows are reported as `None`/`false`, never as errors.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in id order
    async fn get_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>, StoreError>;

    /// Insert a new row; the id is always assigned by the store
    async fn create(&self, payload: &BookPayload) -> Result<Option<Book>, StoreError>;

    /// Replace title and author of an existing row; `None` if no row has `id`
    async fn update(&self, id: i64, payload: &BookPayload) -> Result<Option<Book>, StoreError>;

    /// Remove the row; `false` if no row has `id`
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>("SELECT id, title, author FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn create(&self, payload: &BookPayload) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author) VALUES (?, ?) RETURNING id, title, author",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, id: i64, payload: &BookPayload) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = ?, author = ? WHERE id = ? RETURNING id, title, author",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Default)]
struct Shelf {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Process-local store with the same id semantics as the SQLite table:
/// ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryBookStore {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given payloads, ids assigned in order
    pub fn with_books(payloads: impl IntoIterator<Item = BookPayload>) -> Self {
        let mut shelf = Shelf::default();
        for payload in payloads {
            shelf.last_id += 1;
            let id = shelf.last_id;
            shelf.books.insert(id, payload.into_book(id));
        }

        Self {
            shelf: RwLock::new(shelf),
        }
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.shelf.read().await.books.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        Ok(self.shelf.read().await.books.get(&id).cloned())
    }

    async fn create(&self, payload: &BookPayload) -> Result<Option<Book>, StoreError> {
        let mut shelf = self.shelf.write().await;
        shelf.last_id += 1;
        let book = payload.clone().into_book(shelf.last_id);
        shelf.books.insert(book.id, book.clone());
        Ok(Some(book))
    }

    async fn update(&self, id: i64, payload: &BookPayload) -> Result<Option<Book>, StoreError> {
        let mut shelf = self.shelf.write().await;
        let Some(slot) = shelf.books.get_mut(&id) else {
            return Ok(None);
        };

        *slot = payload.clone().into_book(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.shelf.write().await.books.remove(&id).is_some())
    }
}
