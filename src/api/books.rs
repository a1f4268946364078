//! Book catalog endpoints: CRUD plus the bulk import pipeline

use std::path::Path;

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    import::TempUpload,
    models::{
        book::{Book, BookSummary, DeletedBook, UpdateBook},
        import::{BookDraft, ImportRejection, ImportReport},
    },
};

use super::AuthenticatedUser;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// List all books as summaries
#[utoipa::path(
    get,
    path = "/books/bulk",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of book summaries", body = Vec<BookSummary>)
    )
)]
pub async fn list_book_summaries(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookSummary>>> {
    let books = state.services.books.list_summaries().await?;
    Ok(Json(books))
}

/// Create a single book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = BookSummary),
        (status = 400, description = "Invalid book data")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(draft): Json<BookDraft>,
) -> AppResult<(StatusCode, Json<BookSummary>)> {
    let created = state.services.books.create(draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookSummary),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    UrlPath(id): UrlPath<i32>,
    Json(changes): Json<UpdateBook>,
) -> AppResult<Json<BookSummary>> {
    let updated = state.services.books.update(id, changes).await?;
    Ok(Json(updated))
}

/// Response for DELETE /books/{id}
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBookResponse {
    pub message: String,
    pub deleted_book: DeletedBook,
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    UrlPath(id): UrlPath<i32>,
) -> AppResult<Json<DeleteBookResponse>> {
    let deleted = state.services.books.delete(id).await?;
    Ok(Json(DeleteBookResponse {
        message: "Book deleted successfully".to_string(),
        deleted_book: deleted,
    }))
}

/// Request body for bulk deletion
#[derive(Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub message: String,
}

/// Delete multiple books by ID
#[utoipa::path(
    post,
    path = "/books/bulk-delete",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Books deleted", body = BulkDeleteResponse),
        (status = 400, description = "Empty ID list")
    )
)]
pub async fn bulk_delete_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    state.services.books.delete_many(&request.ids).await?;
    Ok(Json(BulkDeleteResponse {
        message: "Books deleted successfully".to_string(),
    }))
}

/// Bulk import from a JSON array of canonical book inputs
#[utoipa::path(
    post,
    path = "/books/bulk",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = Vec<BookDraft>,
    responses(
        (status = 201, description = "Bulk insert completed (possibly partial)", body = ImportReport),
        (status = 400, description = "Empty, all-invalid or all-duplicate input", body = ImportRejection)
    )
)]
pub async fn bulk_import(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<ImportReport>)> {
    // The body must be a non-empty array; anything else is the same 400 as
    // an empty submission, not a serde-shaped error.
    let drafts: Vec<BookDraft> = match body {
        serde_json::Value::Array(items) if !items.is_empty() => {
            serde_json::from_value(serde_json::Value::Array(items))
                .map_err(|e| AppError::BadRequest(format!("Invalid book array: {}", e)))?
        }
        _ => return Err(AppError::ImportRejected(ImportRejection::empty_body())),
    };
    let report = state.services.import.import_drafts(drafts).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Bulk import from an uploaded CSV/XLSX file.
///
/// The upload is staged under the configured directory and removed on every
/// exit path, including unsupported-format and parse-failure responses.
#[utoipa::path(
    post,
    path = "/books/upload",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data",
        description = "Multipart form with a single `file` field (.csv, .xlsx or .xlsm)"),
    responses(
        (status = 201, description = "Bulk insert completed (possibly partial)", body = ImportReport),
        (status = 400, description = "Missing file, unsupported type or no importable rows", body = ImportRejection),
        (status = 500, description = "Parse or storage failure")
    )
)]
pub async fn upload_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ImportReport>)> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::ImportRejected(ImportRejection::no_file()))?;

    // Same extension rule as the original upload contract: everything after
    // the last dot, lowercased ("report.CSV" -> "csv", "report" -> "report").
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let staged = TempUpload::stage(Path::new(&state.config.import.upload_dir), &data).await?;
    let report = state
        .services
        .import
        .import_file(staged.path(), &extension)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}
