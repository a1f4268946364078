//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    import::validator,
    models::book::{Book, BookSummary, DeletedBook, UpdateBook},
    models::import::BookDraft,
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn list_summaries(&self) -> AppResult<Vec<BookSummary>> {
        let books = self.repository.books.list().await?;
        Ok(books.into_iter().map(BookSummary::from).collect())
    }

    /// Create a single book. The payload goes through the same coercion
    /// rules as bulk import so both entry points accept identical shapes.
    pub async fn create(&self, draft: BookDraft) -> AppResult<BookSummary> {
        let split = validator::validate_rows(std::slice::from_ref(&draft));
        let book = split
            .valid
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Validation("Invalid book data".to_string()))?;
        let created = self.repository.books.create(&book).await?;
        Ok(BookSummary::from(created))
    }

    pub async fn update(&self, id: i32, changes: UpdateBook) -> AppResult<BookSummary> {
        if let Some(count) = changes.published_count {
            if count < 0 {
                return Err(AppError::Validation(
                    "publishedCount must be non-negative".to_string(),
                ));
            }
        }
        let updated = self.repository.books.update(id, &changes).await?;
        Ok(BookSummary::from(updated))
    }

    pub async fn delete(&self, id: i32) -> AppResult<DeletedBook> {
        let deleted = self.repository.books.delete(id).await?;
        Ok(DeletedBook::from(deleted))
    }

    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::BadRequest(
                "Please provide an array of book IDs to delete".to_string(),
            ));
        }
        self.repository.books.delete_many(ids).await
    }
}
