//! Student endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::student::{CreateStudent, Student, UpdateStudent},
};

use super::AuthenticatedUser;

/// List all students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of students", body = Vec<Student>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list().await?;
    Ok(Json(students))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid student data"),
        (status = 409, description = "Roll number already taken")
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(student): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = state.services.students.create(student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a student by roll number
#[utoipa::path(
    put,
    path = "/students/{roll_no}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("roll_no" = String, Path, description = "Student roll number")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(roll_no): Path<String>,
    Json(changes): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    let updated = state.services.students.update(&roll_no, changes).await?;
    Ok(Json(updated))
}

#[derive(Serialize, ToSchema)]
pub struct DeleteStudentResponse {
    pub message: String,
}

/// Delete a student by roll number
#[utoipa::path(
    delete,
    path = "/students/{roll_no}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("roll_no" = String, Path, description = "Student roll number")
    ),
    responses(
        (status = 200, description = "Student deleted", body = DeleteStudentResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(roll_no): Path<String>,
) -> AppResult<Json<DeleteStudentResponse>> {
    state.services.students.delete(&roll_no).await?;
    Ok(Json(DeleteStudentResponse {
        message: "Student deleted".to_string(),
    }))
}
