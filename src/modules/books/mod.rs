pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use service::{BookCatalog, BookService};
use store::SqliteBookStore;

/// Books module: CRUD over the `books` table
pub struct BooksModule {
    service: Arc<dyn BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<dyn BookService>) -> Self {
        Self { service }
    }

    /// Table bootstrap for the books module
    pub fn schema() -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL
                );
                "#,
        }]
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::schema()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module backed by the given pool
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    let store = Arc::new(SqliteBookStore::new(pool));
    let service = Arc::new(BookCatalog::new(store));
    Arc::new(BooksModule::new(service))
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "text/plain": {
                "schema": { "$ref": "#/components/schemas/ErrorMessage" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn book_body() -> serde_json::Value {
    serde_json::json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookPayload" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = serde_json::json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });

    serde_json::json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_body(),
                    "responses": {
                        "201": book_response("Created book"),
                        "400": error_response("Malformed body or missing required fields"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/{id}": {
                "get": {
                    "summary": "Get a book by ID",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": book_response("The book"),
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": book_body(),
                    "responses": {
                        "200": book_response("Updated book"),
                        "400": error_response("Invalid ID, malformed body or missing required fields"),
                        "404": error_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "204": { "description": "Book deleted" },
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "format": "int64",
                            "description": "Identifier assigned on creation"
                        },
                        "title": {
                            "type": "string",
                            "description": "Title of the book"
                        },
                        "author": {
                            "type": "string",
                            "description": "Author of the book"
                        }
                    },
                    "required": ["id", "title", "author"]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "minLength": 1,
                            "description": "Title of the book"
                        },
                        "author": {
                            "type": "string",
                            "minLength": 1,
                            "description": "Author of the book"
                        }
                    },
                    "required": ["title", "author"]
                }
            }
        }
    })
}
