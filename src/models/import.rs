//! Bulk-import models: raw rows, canonical drafts, and the import report.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::book::{BookStatus, BookSummary};

/// One record from an uploaded file before normalization. Column order is
/// preserved because alias matching is order-sensitive (last match wins).
pub type RawRow = IndexMap<String, Value>;

/// Canonical book fields before coercion. Values stay loosely typed: file
/// cells may be numbers or dates and the JSON bulk endpoint accepts
/// whatever the client sent; the validator coerces.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    #[schema(value_type = Option<Object>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub genre: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub published_count: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub status: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub height: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<Value>,
}

impl BookDraft {
    /// Assign a canonical field by name. Unknown names are ignored, matching
    /// the normalizer contract that unrecognized columns are dropped.
    pub fn set(&mut self, field: &str, value: Value) {
        match field {
            "title" => self.title = Some(value),
            "author" => self.author = Some(value),
            "genre" => self.genre = Some(value),
            "publishedCount" => self.published_count = Some(value),
            "status" => self.status = Some(value),
            "height" => self.height = Some(value),
            "publisher" => self.publisher = Some(value),
            "location" => self.location = Some(value),
            _ => {}
        }
    }
}

/// A row that passed validation, fields coerced to their target shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_count: i64,
    pub status: BookStatus,
    pub height: String,
    pub publisher: String,
    pub location: String,
}

impl ValidatedBook {
    /// Case-insensitive (title, author) duplicate key
    pub fn duplicate_key(&self) -> String {
        format!(
            "{}-{}",
            self.title.to_lowercase(),
            self.author.to_lowercase()
        )
    }
}

/// A rejected row with its original (1-based, header-offset) file row index
/// and the partially-coerced values, for diagnostic display.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRow {
    pub row: usize,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// None when the submitted value was not coercible to a number
    pub published_count: Option<i64>,
    pub status: String,
    pub height: String,
    pub publisher: String,
    pub location: String,
}

/// Report returned on any import that inserted at least one book
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub message: String,
    pub total_submitted: usize,
    pub inserted_count: usize,
    pub duplicate_count: usize,
    pub invalid_count: usize,
    pub invalid_books: Vec<InvalidRow>,
    pub inserted_books: Vec<BookSummary>,
}

/// Body returned on 400 when an import is rejected before insertion
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRejection {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_books: Option<Vec<InvalidRow>>,
}

impl ImportRejection {
    fn message_only(message: &str) -> Self {
        Self {
            message: message.to_string(),
            invalid_count: None,
            duplicate_count: None,
            invalid_books: None,
        }
    }

    pub fn no_file() -> Self {
        Self::message_only("No file uploaded")
    }

    pub fn unsupported_format() -> Self {
        Self::message_only("Unsupported file type")
    }

    pub fn no_data() -> Self {
        Self::message_only("No data found in file")
    }

    pub fn empty_body() -> Self {
        Self::message_only("Request body must be a non-empty array of books")
    }

    pub fn no_valid_entries(invalid: Vec<InvalidRow>) -> Self {
        Self {
            message: "No valid book entries to insert.".to_string(),
            invalid_count: Some(invalid.len()),
            duplicate_count: None,
            invalid_books: Some(invalid),
        }
    }

    pub fn all_duplicates(duplicate_count: usize, invalid: Vec<InvalidRow>) -> Self {
        Self {
            message: "All submitted books already exist.".to_string(),
            invalid_count: None,
            duplicate_count: Some(duplicate_count),
            invalid_books: Some(invalid),
        }
    }
}
