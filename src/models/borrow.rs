//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

/// Return status of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReturnStatus {
    Returned,
    #[serde(rename = "Not Returned")]
    NotReturned,
    Overdue,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Returned => "Returned",
            ReturnStatus::NotReturned => "Not Returned",
            ReturnStatus::Overdue => "Overdue",
        }
    }
}

impl Default for ReturnStatus {
    fn default() -> Self {
        ReturnStatus::NotReturned
    }
}

impl std::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReturnStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Returned" => Ok(ReturnStatus::Returned),
            "Not Returned" => Ok(ReturnStatus::NotReturned),
            "Overdue" => Ok(ReturnStatus::Overdue),
            _ => Err(format!("Invalid return status: {}", s)),
        }
    }
}

// SQLx conversion for ReturnStatus (stored as TEXT)
impl sqlx::Type<Postgres> for ReturnStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ReturnStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ReturnStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Borrow record model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde(rename = "_id")]
    pub id: i32,
    pub student_name: String,
    pub student_id: String,
    pub book_title: String,
    pub student_email: Option<String>,
    pub student_phone: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_status: ReturnStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BorrowRecord {
    /// True when the record is past due and not returned
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.return_status != ReturnStatus::Returned && self.due_date < now
    }

    /// Display-time overdue flagging: flips the in-memory status without
    /// persisting, so stale records still read as overdue between sweeps.
    pub fn flag_overdue(&mut self, now: DateTime<Utc>) {
        if self.is_past_due(now) {
            self.return_status = ReturnStatus::Overdue;
        }
    }
}

/// Create borrow record request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrow {
    pub student_name: String,
    pub student_id: String,
    pub book_title: String,
    pub student_email: Option<String>,
    pub student_phone: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub return_status: Option<ReturnStatus>,
}

/// Partial update payload for PUT /borrowed/:id
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBorrow {
    pub student_name: Option<String>,
    pub student_id: Option<String>,
    pub book_title: Option<String>,
    pub student_email: Option<String>,
    pub student_phone: Option<String>,
    pub borrow_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub return_status: Option<ReturnStatus>,
}

/// Borrow list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BorrowQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Filter by return status
    pub status: Option<String>,
    /// Free-text search over student name, student id and book title
    pub search: Option<String>,
    /// `field:order`, e.g. `dueDate:desc`
    pub sort: Option<String>,
}

/// Paginated borrow list response
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowPage {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub records: Vec<BorrowRecord>,
}
