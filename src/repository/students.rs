//! Students repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::{CreateStudent, Student, UpdateStudent},
};

const STUDENT_COLUMNS: &str = "id, roll_no, name, department, year_of_study, \
     admission_year, email, created_at, updated_at";

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students ORDER BY id",
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    pub async fn create(&self, student: &CreateStudent) -> AppResult<Student> {
        let created = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (roll_no, name, department, year_of_study, admission_year, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(&student.roll_no)
        .bind(&student.name)
        .bind(&student.department)
        .bind(student.year_of_study)
        .bind(student.admission_year)
        .bind(&student.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "Student with this roll number already exists".to_string(),
            ),
            _ => AppError::from(e),
        })?;
        Ok(created)
    }

    pub async fn update_by_roll_no(
        &self,
        roll_no: &str,
        changes: &UpdateStudent,
    ) -> AppResult<Student> {
        let updated = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                department = COALESCE($3, department),
                year_of_study = COALESCE($4, year_of_study),
                admission_year = COALESCE($5, admission_year),
                email = COALESCE($6, email),
                updated_at = now()
            WHERE roll_no = $1
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(roll_no)
        .bind(&changes.name)
        .bind(&changes.department)
        .bind(changes.year_of_study)
        .bind(changes.admission_year)
        .bind(&changes.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        Ok(updated)
    }

    pub async fn delete_by_roll_no(&self, roll_no: &str) -> AppResult<Student> {
        let deleted = sqlx::query_as::<_, Student>(&format!(
            "DELETE FROM students WHERE roll_no = $1 RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(roll_no)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        Ok(deleted)
    }
}
