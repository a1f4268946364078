//! Borrow record management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowPage, BorrowQuery, BorrowRecord, CreateBorrow, UpdateBorrow},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Paginated listing with display-time overdue flagging, so a record
    /// past its due date reads as overdue even before the sweep persists it.
    pub async fn search(&self, query: &BorrowQuery) -> AppResult<BorrowPage> {
        let (mut records, total) = self.repository.borrows.search(query).await?;
        let now = Utc::now();
        for record in &mut records {
            record.flag_overdue(now);
        }
        Ok(BorrowPage {
            total,
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(10).max(1),
            records,
        })
    }

    pub async fn create(&self, record: CreateBorrow) -> AppResult<BorrowRecord> {
        if record.due_date < record.borrow_date {
            return Err(AppError::Validation(
                "dueDate must not be before borrowDate".to_string(),
            ));
        }
        self.repository.borrows.create(&record).await
    }

    pub async fn update(&self, id: i32, changes: UpdateBorrow) -> AppResult<BorrowRecord> {
        self.repository.borrows.update(id, &changes).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.borrows.delete(id).await
    }

    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::BadRequest(
                "Please provide an array of record IDs to delete".to_string(),
            ));
        }
        self.repository.borrows.delete_many(ids).await
    }
}
