//! Business logic services

pub mod books;
pub mod borrows;
pub mod google_books;
pub mod import;
pub mod notifier;
pub mod overdue;
pub mod students;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub students: students::StudentsService,
    pub borrows: borrows::BorrowsService,
    pub import: import::ImportService,
    pub notifier: notifier::NotifierService,
    pub google_books: google_books::GoogleBooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            students: students::StudentsService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone()),
            import: import::ImportService::new(Arc::new(repository.books.clone())),
            notifier: notifier::NotifierService::new(config.email.clone()),
            google_books: google_books::GoogleBooksService::new(config.google_books.clone()),
        }
    }
}
