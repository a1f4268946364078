//! Borrow record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{BorrowPage, BorrowQuery, BorrowRecord, CreateBorrow, UpdateBorrow},
};

use super::{books::BulkDeleteRequest, AuthenticatedUser};

/// List borrow records with pagination, filtering, search and sorting
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "borrowed",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Paginated borrow records", body = BorrowPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<BorrowPage>> {
    let page = state.services.borrows.search(&query).await?;
    Ok(Json(page))
}

/// Create a borrow record
#[utoipa::path(
    post,
    path = "/borrowed",
    tag = "borrowed",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Record created", body = BorrowRecord),
        (status = 400, description = "Invalid record data")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(record): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let created = state.services.borrows.create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a borrow record
#[utoipa::path(
    put,
    path = "/borrowed/{id}",
    tag = "borrowed",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Record ID")
    ),
    request_body = UpdateBorrow,
    responses(
        (status = 200, description = "Record updated", body = BorrowRecord),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateBorrow>,
) -> AppResult<Json<BorrowRecord>> {
    let updated = state.services.borrows.update(id, changes).await?;
    Ok(Json(updated))
}

#[derive(Serialize, ToSchema)]
pub struct DeleteBorrowResponse {
    pub message: String,
}

/// Delete a borrow record
#[utoipa::path(
    delete,
    path = "/borrowed/{id}",
    tag = "borrowed",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = DeleteBorrowResponse),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteBorrowResponse>> {
    state.services.borrows.delete(id).await?;
    Ok(Json(DeleteBorrowResponse {
        message: "Record deleted successfully".to_string(),
    }))
}

/// Delete multiple borrow records by ID
#[utoipa::path(
    post,
    path = "/borrowed/bulk-delete",
    tag = "borrowed",
    security(("bearer_auth" = [])),
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Records deleted", body = DeleteBorrowResponse),
        (status = 400, description = "Empty ID list")
    )
)]
pub async fn bulk_delete_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<DeleteBorrowResponse>> {
    state.services.borrows.delete_many(&request.ids).await?;
    Ok(Json(DeleteBorrowResponse {
        message: "Records deleted".to_string(),
    }))
}
