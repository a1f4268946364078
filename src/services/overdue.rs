//! Scheduled overdue detection sweep.
//!
//! Owned by `main`, not by module-level state: the sweeper is constructed
//! with its collaborators and spawned as a plain tokio task with its own
//! lifecycle.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::{
    error::AppResult,
    models::borrow::ReturnStatus,
    repository::Repository,
    services::notifier::NotifierService,
};

pub struct OverdueSweeper {
    repository: Repository,
    notifier: NotifierService,
    period: Duration,
}

impl OverdueSweeper {
    pub fn new(repository: Repository, notifier: NotifierService, period: Duration) -> Self {
        Self {
            repository,
            notifier,
            period,
        }
    }

    /// Spawn the recurring sweep task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            // The first tick fires immediately; skip it so startup does not
            // race the database migration.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = self.sweep().await {
                    tracing::error!("Overdue sweep failed: {}", e);
                }
            }
        })
    }

    /// One pass: flip every past-due, non-returned record to Overdue and
    /// notify the borrower. Records are handled one at a time; a
    /// notification failure is logged and does not stop the sweep.
    pub async fn sweep(&self) -> AppResult<usize> {
        tracing::info!("Checking overdue books...");
        let records = self.repository.borrows.list_all().await?;
        let now = Utc::now();
        let mut flagged = 0;

        for record in records {
            if !record.is_past_due(now) || record.return_status == ReturnStatus::Overdue {
                continue;
            }

            self.repository
                .borrows
                .set_status(record.id, ReturnStatus::Overdue)
                .await?;
            flagged += 1;

            if let Some(email) = record.student_email.as_deref().filter(|s| !s.is_empty()) {
                if let Err(e) = self
                    .notifier
                    .send_overdue_email(email, &record.student_name, &record.book_title)
                    .await
                {
                    tracing::warn!(
                        "Failed to email overdue reminder for record {}: {}",
                        record.id,
                        e
                    );
                }
            }

            if let Some(phone) = record.student_phone.as_deref().filter(|s| !s.is_empty()) {
                if let Err(e) = self
                    .notifier
                    .send_overdue_sms(phone, &record.book_title)
                    .await
                {
                    tracing::warn!(
                        "Failed to send overdue SMS for record {}: {}",
                        record.id,
                        e
                    );
                }
            }
        }

        tracing::info!("Overdue check complete: {} records flagged", flagged);
        Ok(flagged)
    }
}
