//! Bulk import service: validation, duplicate filtering and batched insert.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    import::{normalizer, parser, validator},
    models::{
        book::{Book, BookSummary},
        import::{BookDraft, ImportRejection, ImportReport, ValidatedBook},
    },
    repository::books::BooksRepository,
};

/// Storage operations the import pipeline needs: one batched existence
/// check and one unordered batched insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn find_existing_pairs(
        &self,
        pairs: &[(String, String)],
    ) -> AppResult<Vec<(String, String)>>;

    async fn insert_many(&self, books: &[ValidatedBook]) -> AppResult<Vec<Book>>;
}

#[async_trait]
impl ImportStore for BooksRepository {
    async fn find_existing_pairs(
        &self,
        pairs: &[(String, String)],
    ) -> AppResult<Vec<(String, String)>> {
        BooksRepository::find_existing_pairs(self, pairs).await
    }

    async fn insert_many(&self, books: &[ValidatedBook]) -> AppResult<Vec<Book>> {
        BooksRepository::insert_many(self, books).await
    }
}

#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn ImportStore>,
}

impl ImportService {
    pub fn new(store: Arc<dyn ImportStore>) -> Self {
        Self { store }
    }

    /// Import a staged upload file: parse by extension, normalize column
    /// names, then run the shared pipeline. The caller owns the temp file.
    pub async fn import_file(&self, path: &Path, extension: &str) -> AppResult<ImportReport> {
        let rows = parser::parse_rows(path, extension)?;
        if rows.is_empty() {
            return Err(AppError::ImportRejected(ImportRejection::no_data()));
        }
        let drafts: Vec<BookDraft> = rows.iter().map(normalizer::normalize_row).collect();
        self.import_drafts(drafts).await
    }

    /// Shared pipeline: validate → filter duplicates → unordered insert.
    pub async fn import_drafts(&self, drafts: Vec<BookDraft>) -> AppResult<ImportReport> {
        let total_submitted = drafts.len();
        let split = validator::validate_rows(&drafts);
        tracing::info!(
            "Parsed {} rows: {} valid, {} invalid",
            total_submitted,
            split.valid.len(),
            split.invalid.len()
        );

        if split.valid.is_empty() {
            return Err(AppError::ImportRejected(ImportRejection::no_valid_entries(
                split.invalid,
            )));
        }

        let pairs: Vec<(String, String)> = split
            .valid
            .iter()
            .map(|b| (b.title.clone(), b.author.clone()))
            .collect();
        let existing = self.store.find_existing_pairs(&pairs).await?;
        let existing_keys: HashSet<String> = existing
            .iter()
            .map(|(title, author)| {
                format!("{}-{}", title.to_lowercase(), author.to_lowercase())
            })
            .collect();

        let new_books: Vec<ValidatedBook> = split
            .valid
            .iter()
            .filter(|b| !existing_keys.contains(&b.duplicate_key()))
            .cloned()
            .collect();

        if new_books.is_empty() {
            return Err(AppError::ImportRejected(ImportRejection::all_duplicates(
                split.valid.len(),
                split.invalid,
            )));
        }

        let inserted = self.store.insert_many(&new_books).await?;
        tracing::info!("Inserted {} new books", inserted.len());

        Ok(ImportReport {
            message: "Bulk insert completed".to_string(),
            total_submitted,
            inserted_count: inserted.len(),
            duplicate_count: split.valid.len() - new_books.len(),
            invalid_count: split.invalid.len(),
            invalid_books: split.invalid,
            inserted_books: inserted.into_iter().map(BookSummary::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookStatus;
    use chrono::Utc;
    use serde_json::json;

    fn draft(title: &str, author: &str) -> BookDraft {
        BookDraft {
            title: Some(json!(title)),
            author: Some(json!(author)),
            ..Default::default()
        }
    }

    fn persisted(id: i32, book: &ValidatedBook) -> Book {
        let now = Utc::now();
        Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            published_count: book.published_count,
            status: book.status,
            height: book.height.clone(),
            publisher: book.publisher.clone(),
            location: book.location.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn all_invalid_input_never_touches_storage() {
        // No expectations set: any store call panics the test.
        let store = MockImportStore::new();
        let service = ImportService::new(Arc::new(store));

        let err = service
            .import_drafts(vec![draft("", ""), draft("  ", "x")])
            .await
            .unwrap_err();

        match err {
            AppError::ImportRejected(rejection) => {
                assert_eq!(rejection.message, "No valid book entries to insert.");
                assert_eq!(rejection.invalid_count, Some(2));
            }
            other => panic!("expected import rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn mixed_batch_reports_every_bucket() {
        let mut store = MockImportStore::new();
        store
            .expect_find_existing_pairs()
            .times(1)
            .returning(|_| Ok(vec![("Emma".to_string(), "Jane Austen".to_string())]));
        store.expect_insert_many().times(1).returning(|books| {
            Ok(books
                .iter()
                .enumerate()
                .map(|(i, b)| persisted(i as i32 + 1, b))
                .collect())
        });
        let service = ImportService::new(Arc::new(store));

        // 5 rows: 2 invalid, 1 duplicate of the catalog, 2 new-valid
        let report = service
            .import_drafts(vec![
                draft("Dune", "Frank Herbert"),
                draft("", "Nobody"),
                draft("EMMA", "JANE AUSTEN"),
                draft("Ilium", "Dan Simmons"),
                draft("Ghost", ""),
            ])
            .await
            .unwrap();

        assert_eq!(report.total_submitted, 5);
        assert_eq!(report.invalid_count, 2);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.inserted_count, 2);
        assert_eq!(report.inserted_books.len(), 2);
        assert_eq!(report.invalid_books[0].row, 3);
        assert_eq!(report.invalid_books[1].row, 6);
    }

    #[tokio::test]
    async fn all_duplicates_skip_insertion() {
        let mut store = MockImportStore::new();
        store.expect_find_existing_pairs().times(1).returning(|pairs| {
            // Everything submitted already exists
            Ok(pairs.to_vec())
        });
        let service = ImportService::new(Arc::new(store));

        let err = service
            .import_drafts(vec![draft("Dune", "Frank Herbert")])
            .await
            .unwrap_err();

        match err {
            AppError::ImportRejected(rejection) => {
                assert_eq!(rejection.message, "All submitted books already exist.");
                assert_eq!(rejection.duplicate_count, Some(1));
            }
            other => panic!("expected import rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn duplicate_check_is_case_insensitive() {
        let mut store = MockImportStore::new();
        store
            .expect_find_existing_pairs()
            .returning(|_| Ok(vec![("dune".to_string(), "FRANK HERBERT".to_string())]));
        let service = ImportService::new(Arc::new(store));

        let err = service
            .import_drafts(vec![draft("Dune", "Frank Herbert")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImportRejected(_)));
    }

    #[tokio::test]
    async fn partial_insert_failure_reduces_inserted_count() {
        let mut store = MockImportStore::new();
        store
            .expect_find_existing_pairs()
            .returning(|_| Ok(Vec::new()));
        store.expect_insert_many().returning(|books| {
            // The store dropped one row (unordered insert semantics)
            Ok(books
                .iter()
                .skip(1)
                .enumerate()
                .map(|(i, b)| persisted(i as i32 + 1, b))
                .collect())
        });
        let service = ImportService::new(Arc::new(store));

        let report = service
            .import_drafts(vec![
                draft("Dune", "Frank Herbert"),
                draft("Emma", "Jane Austen"),
            ])
            .await
            .unwrap();

        assert_eq!(report.total_submitted, 2);
        assert_eq!(report.inserted_count, 1);
        assert_eq!(report.duplicate_count, 0);
    }

    #[tokio::test]
    async fn validated_fields_flow_into_the_store() {
        let mut store = MockImportStore::new();
        store
            .expect_find_existing_pairs()
            .returning(|_| Ok(Vec::new()));
        store
            .expect_insert_many()
            .withf(|books| {
                books.len() == 1
                    && books[0].title == "Dune"
                    && books[0].published_count == 4
                    && books[0].status == BookStatus::Borrowed
            })
            .returning(|books| Ok(vec![persisted(1, &books[0])]));
        let service = ImportService::new(Arc::new(store));

        let mut d = draft(" Dune ", "Frank Herbert");
        d.published_count = Some(json!("4"));
        d.status = Some(json!("Borrowed"));
        let report = service.import_drafts(vec![d]).await.unwrap();
        assert_eq!(report.inserted_books[0].title, "Dune");
    }
}
