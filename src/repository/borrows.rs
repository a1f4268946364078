//! Borrow records repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowQuery, BorrowRecord, CreateBorrow, ReturnStatus, UpdateBorrow},
};

const BORROW_COLUMNS: &str = "id, student_name, student_id, book_title, student_email, \
     student_phone, borrow_date, due_date, return_status, created_at, updated_at";

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Translate an API sort field to its column; anything unknown falls back
/// to the default due-date ordering.
fn sort_column(field: &str) -> &'static str {
    match field {
        "borrowDate" => "borrow_date",
        "dueDate" => "due_date",
        "studentName" => "student_name",
        "studentId" => "student_id",
        "bookTitle" => "book_title",
        "returnStatus" => "return_status",
        "createdAt" => "created_at",
        _ => "due_date",
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BorrowQuery) {
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        builder.push(" AND return_status = ");
        builder.push_bind(status.to_string());
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder.push(" AND (student_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR student_id ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR book_title ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Paginated, filtered, sorted listing. Returns the page plus the total
    /// count matching the filters.
    pub async fn search(&self, query: &BorrowQuery) -> AppResult<(Vec<BorrowRecord>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) AS total FROM borrow_records WHERE 1=1");
        push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build()
            .fetch_one(&self.pool)
            .await?
            .get("total");

        let (sort_field, descending) = match query.sort.as_deref() {
            Some(sort) => {
                let mut parts = sort.splitn(2, ':');
                let field = parts.next().unwrap_or_default();
                let order = parts.next().unwrap_or("asc");
                (sort_column(field), order.eq_ignore_ascii_case("desc"))
            }
            None => ("due_date", false),
        };

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM borrow_records WHERE 1=1",
            BORROW_COLUMNS
        ));
        push_filters(&mut builder, query);
        builder.push(format!(
            " ORDER BY {} {}",
            sort_field,
            if descending { "DESC" } else { "ASC" }
        ));
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind((page - 1) * limit);

        let records = builder
            .build_query_as::<BorrowRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total))
    }

    /// Full scan used by the overdue sweep
    pub async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(&format!(
            "SELECT {} FROM borrow_records ORDER BY due_date",
            BORROW_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn create(&self, record: &CreateBorrow) -> AppResult<BorrowRecord> {
        let created = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            INSERT INTO borrow_records
                (student_name, student_id, book_title, student_email, student_phone,
                 borrow_date, due_date, return_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BORROW_COLUMNS
        ))
        .bind(&record.student_name)
        .bind(&record.student_id)
        .bind(&record.book_title)
        .bind(&record.student_email)
        .bind(&record.student_phone)
        .bind(record.borrow_date)
        .bind(record.due_date)
        .bind(record.return_status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i32, changes: &UpdateBorrow) -> AppResult<BorrowRecord> {
        let updated = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            UPDATE borrow_records SET
                student_name = COALESCE($2, student_name),
                student_id = COALESCE($3, student_id),
                book_title = COALESCE($4, book_title),
                student_email = COALESCE($5, student_email),
                student_phone = COALESCE($6, student_phone),
                borrow_date = COALESCE($7, borrow_date),
                due_date = COALESCE($8, due_date),
                return_status = COALESCE($9, return_status),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            BORROW_COLUMNS
        ))
        .bind(id)
        .bind(&changes.student_name)
        .bind(&changes.student_id)
        .bind(&changes.book_title)
        .bind(&changes.student_email)
        .bind(&changes.student_phone)
        .bind(changes.borrow_date)
        .bind(changes.due_date)
        .bind(changes.return_status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;
        Ok(updated)
    }

    /// Persist a status flip (used by the overdue sweep)
    pub async fn set_status(&self, id: i32, status: ReturnStatus) -> AppResult<()> {
        sqlx::query("UPDATE borrow_records SET return_status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM borrow_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM borrow_records WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
