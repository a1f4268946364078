//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, UpdateBook},
    models::import::ValidatedBook,
};

const BOOK_COLUMNS: &str = "id, title, author, genre, published_count, status, \
     height, publisher, location, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    pub async fn create(&self, book: &ValidatedBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, published_count, status, height, publisher, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.published_count)
        .bind(book.status)
        .bind(&book.height)
        .bind(&book.publisher)
        .bind(&book.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "A book with this title and author already exists".to_string(),
            ),
            _ => AppError::from(e),
        })?;
        Ok(created)
    }

    pub async fn update(&self, id: i32, changes: &UpdateBook) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                genre = COALESCE($4, genre),
                published_count = COALESCE($5, published_count),
                status = COALESCE($6, status),
                height = COALESCE($7, height),
                publisher = COALESCE($8, publisher),
                location = COALESCE($9, location),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(&changes.genre)
        .bind(changes.published_count)
        .bind(changes.status)
        .bind(&changes.height)
        .bind(&changes.publisher)
        .bind(&changes.location)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "A book with this title and author already exists".to_string(),
            ),
            _ => AppError::from(e),
        })?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        let deleted = sqlx::query_as::<_, Book>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok(deleted)
    }

    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Batched existence check for import-time deduplication: one query for
    /// every candidate (title, author) pair, compared case-insensitively.
    pub async fn find_existing_pairs(
        &self,
        pairs: &[(String, String)],
    ) -> AppResult<Vec<(String, String)>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT title, author FROM books WHERE (lower(title), lower(author)) IN ",
        );
        builder.push_tuples(pairs, |mut b, (title, author)| {
            b.push_bind(title.to_lowercase())
                .push_bind(author.to_lowercase());
        });

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|r| (r.get("title"), r.get("author")))
            .collect())
    }

    /// Unordered batched insert: each row is attempted independently, so a
    /// constraint violation on one row never aborts the rest. Rows losing
    /// the unique-index race are skipped silently; other database errors on
    /// a row are logged and that row dropped; connection-level failures
    /// abort the whole operation.
    pub async fn insert_many(&self, books: &[ValidatedBook]) -> AppResult<Vec<Book>> {
        let mut inserted = Vec::with_capacity(books.len());

        for book in books {
            let result = sqlx::query_as::<_, Book>(&format!(
                r#"
                INSERT INTO books (title, author, genre, published_count, status, height, publisher, location)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT DO NOTHING
                RETURNING {}
                "#,
                BOOK_COLUMNS
            ))
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.published_count)
            .bind(book.status)
            .bind(&book.height)
            .bind(&book.publisher)
            .bind(&book.location)
            .fetch_optional(&self.pool)
            .await;

            match result {
                Ok(Some(row)) => inserted.push(row),
                Ok(None) => {
                    tracing::warn!(
                        "Skipped insert of '{}' by '{}': already exists",
                        book.title,
                        book.author
                    );
                }
                Err(sqlx::Error::Database(e)) => {
                    tracing::warn!(
                        "Failed to insert '{}' by '{}': {}",
                        book.title,
                        book.author,
                        e
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(inserted)
    }
}
