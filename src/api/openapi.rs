//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrowed, google_books, health, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "0.1.0",
        description = "Library Management Backend REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::list_book_summaries,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::bulk_delete_books,
        books::bulk_import,
        books::upload_books,
        // Students
        students::list_students,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Borrowed
        borrowed::list_borrows,
        borrowed::create_borrow,
        borrowed::update_borrow,
        borrowed::delete_borrow,
        borrowed::bulk_delete_borrows,
        // Google Books
        google_books::search,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookStatus,
            crate::models::book::UpdateBook,
            crate::models::book::DeletedBook,
            books::DeleteBookResponse,
            books::BulkDeleteRequest,
            books::BulkDeleteResponse,
            // Import
            crate::models::import::BookDraft,
            crate::models::import::InvalidRow,
            crate::models::import::ImportReport,
            crate::models::import::ImportRejection,
            // Students
            crate::models::student::Student,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            students::DeleteStudentResponse,
            // Borrowed
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::ReturnStatus,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::UpdateBorrow,
            crate::models::borrow::BorrowPage,
            borrowed::DeleteBorrowResponse,
            // Google Books
            crate::services::google_books::GoogleBooksRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog and bulk import"),
        (name = "students", description = "Student management"),
        (name = "borrowed", description = "Borrow record management"),
        (name = "google-books", description = "External book search proxy")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
