//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::Record;

/// Book record as persisted in books.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// ISBN-10 or ISBN-13, unique key
    pub isbn: String,
    pub title: String,
    pub author: String,
    /// Number of copies owned; bounds concurrent active borrows
    pub quantity: u32,
}

impl Record for Book {
    const COLLECTION: &'static str = "books";

    fn key(&self) -> String {
        self.isbn.clone()
    }
}

/// Create book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub quantity: u32,
}

/// Update book request (fields merge into the existing record)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub quantity: Option<u32>,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Substring match on title, author or ISBN
    pub search: Option<String>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    /// Sort field: title, author or quantity
    pub sort: Option<String>,
}
