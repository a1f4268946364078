//! Student model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student record, keyed by roll number for API operations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: i32,
    pub roll_no: String,
    pub name: String,
    pub department: String,
    pub year_of_study: i32,
    pub admission_year: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create student request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "rollNo is required"))]
    pub roll_no: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    pub year_of_study: i32,
    pub admission_year: i32,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
}

/// Partial update payload for PUT /students/:roll_no
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub department: Option<String>,
    pub year_of_study: Option<i32>,
    pub admission_year: Option<i32>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
}
