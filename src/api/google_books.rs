//! Google Books proxy endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::google_books::GoogleBooksRequest};

/// Proxy a search to the Google Books volumes API
#[utoipa::path(
    post,
    path = "/google-books",
    tag = "google-books",
    request_body = GoogleBooksRequest,
    responses(
        (status = 200, description = "Upstream search results, passed through"),
        (status = 400, description = "Missing search term"),
        (status = 502, description = "Upstream API failure")
    )
)]
pub async fn search(
    State(state): State<crate::AppState>,
    Json(request): Json<GoogleBooksRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let results = state.services.google_books.search(&request).await?;
    Ok(Json(results))
}
