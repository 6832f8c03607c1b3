use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Book, BookPayload};
use super::store::{BookStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing required fields")]
    Validation,

    #[error("book {0} not found")]
    NotFound(i64),

    #[error("book was not created")]
    Creation,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Operations exposed to the HTTP layer.
#[async_trait]
pub trait BookService: Send + Sync {
    async fn get_all_books(&self) -> Result<Vec<Book>, ServiceError>;

    async fn get_book_by_id(&self, id: i64) -> Result<Book, ServiceError>;

    async fn create_book(&self, payload: BookPayload) -> Result<Book, ServiceError>;

    async fn update_book(&self, id: i64, payload: BookPayload) -> Result<Book, ServiceError>;

    async fn delete_book(&self, id: i64) -> Result<(), ServiceError>;
}

/// Validates payloads and turns absent rows into [`ServiceError::NotFound`].
pub struct BookCatalog {
    store: Arc<dyn BookStore>,
}

impl BookCatalog {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    fn validate(payload: &BookPayload) -> Result<(), ServiceError> {
        if payload.is_complete() {
            Ok(())
        } else {
            Err(ServiceError::Validation)
        }
    }
}

#[async_trait]
impl BookService for BookCatalog {
    async fn get_all_books(&self) -> Result<Vec<Book>, ServiceError> {
        let books = self.store.get_all().await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to list books");
        })?;

        Ok(books)
    }

    async fn get_book_by_id(&self, id: i64) -> Result<Book, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    async fn create_book(&self, payload: BookPayload) -> Result<Book, ServiceError> {
        Self::validate(&payload)?;

        let book = self
            .store
            .create(&payload)
            .await?
            .ok_or(ServiceError::Creation)?;

        tracing::info!(book_id = book.id, "book created");
        Ok(book)
    }

    async fn update_book(&self, id: i64, payload: BookPayload) -> Result<Book, ServiceError> {
        Self::validate(&payload)?;

        let book = self
            .store
            .update(id, &payload)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    async fn delete_book(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}
