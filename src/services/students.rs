//! Student management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::student::{CreateStudent, Student, UpdateStudent},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        self.repository.students.list().await
    }

    pub async fn create(&self, student: CreateStudent) -> AppResult<Student> {
        student
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.students.create(&student).await
    }

    pub async fn update(&self, roll_no: &str, changes: UpdateStudent) -> AppResult<Student> {
        changes
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .students
            .update_by_roll_no(roll_no, &changes)
            .await
    }

    pub async fn delete(&self, roll_no: &str) -> AppResult<Student> {
        self.repository.students.delete_by_roll_no(roll_no).await
    }
}
