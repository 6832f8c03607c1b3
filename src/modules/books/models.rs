use serde::{Deserialize, Serialize};

/// A book stored in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Identifier assigned by the store on creation
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
}

/// Request body for creating or replacing a book.
///
/// Missing fields decode as empty strings and are rejected by validation.
/// Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl BookPayload {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Both required fields are present.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.author.is_empty()
    }

    pub(crate) fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
        }
    }
}
