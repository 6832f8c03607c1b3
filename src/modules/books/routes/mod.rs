//! HTTP handlers for `/books` and `/books/{id}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use bookshelf_http::AppError;
use serde::de::DeserializeOwned;

use super::models::{Book, BookPayload};
use super::service::{BookService, ServiceError};

pub type SharedService = Arc<dyn BookService>;

/// Method, path and summary of every endpoint served by the books module.
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/books", "Get all books"),
    ("POST", "/books", "Create a new book"),
    ("GET", "/books/{id}", "Get a book by ID"),
    ("PUT", "/books/{id}", "Update a book by ID"),
    ("DELETE", "/books/{id}", "Delete a book by ID"),
];

/// Router serving the books endpoints from `service`.
///
/// The item route captures the whole remainder after `/books/` so that
/// malformed ids such as `1/2` are rejected as bad requests. A bare
/// `/books/` is served by the same handlers with an empty id.
pub fn router(service: SharedService) -> Router {
    let item = || -> MethodRouter<SharedService> {
        get(get_book)
            .put(update_book)
            .delete(delete_book)
            .fallback(item_method_not_allowed)
    };

    Router::new()
        .route(
            "/books",
            get(list_books)
                .post(create_book)
                .fallback(collection_method_not_allowed),
        )
        .route("/books/", item())
        .route("/books/{*id}", item())
        .with_state(service)
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation => AppError::validation(err.to_string()),
            ServiceError::NotFound(_) => AppError::not_found(err.to_string()),
            ServiceError::Creation | ServiceError::Store(_) => AppError::Internal(err.into()),
        }
    }
}

fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::bad_request("Invalid book ID"))
}

/// Id captured after `/books/`, empty when nothing follows the slash.
fn book_id(raw: Option<Path<String>>) -> Result<i64, AppError> {
    let raw = raw.map(|Path(raw)| raw).unwrap_or_default();
    parse_book_id(&raw)
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|err| AppError::bad_request(err.to_string()))
}

async fn list_books(State(service): State<SharedService>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.get_all_books().await?))
}

async fn create_book(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let payload: BookPayload = decode(&body)?;
    let book = service.create_book(payload).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(service): State<SharedService>,
    raw_id: Option<Path<String>>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(raw_id)?;

    Ok(Json(service.get_book_by_id(id).await?))
}

async fn update_book(
    State(service): State<SharedService>,
    raw_id: Option<Path<String>>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let id = book_id(raw_id)?;
    let payload: BookPayload = decode(&body)?;

    Ok(Json(service.update_book(id, payload).await?))
}

async fn delete_book(
    State(service): State<SharedService>,
    raw_id: Option<Path<String>>,
) -> Result<StatusCode, AppError> {
    let id = book_id(raw_id)?;
    service.delete_book(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn collection_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn item_method_not_allowed(raw_id: Option<Path<String>>) -> AppError {
    // The id is validated before the method, so `PATCH /books/abc` is a 400.
    match book_id(raw_id) {
        Ok(_) => AppError::MethodNotAllowed,
        Err(err) => err,
    }
}
