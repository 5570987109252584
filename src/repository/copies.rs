//! Book instances repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, LoanStatus},
};

use super::CopyRepository;

const SELECT_COPIES: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
           bi.due_back, bi.status, bi.borrower_id
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CopyRepository for CopiesRepository {
    async fn list_borrowed_by(&self, borrower_id: i32) -> AppResult<Vec<BookInstance>> {
        let copies = sqlx::query_as::<_, BookInstance>(&format!(
            "{} WHERE bi.borrower_id = $1 AND bi.status = $2 ORDER BY bi.due_back",
            SELECT_COPIES
        ))
        .bind(borrower_id)
        .bind(LoanStatus::OnLoan)
        .fetch_all(&self.pool)
        .await?;

        Ok(copies)
    }

    async fn list_on_loan(&self) -> AppResult<Vec<BookInstance>> {
        let copies = sqlx::query_as::<_, BookInstance>(&format!(
            "{} WHERE bi.status = $1 ORDER BY bi.due_back",
            SELECT_COPIES
        ))
        .bind(LoanStatus::OnLoan)
        .fetch_all(&self.pool)
        .await?;

        Ok(copies)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!("{} WHERE bi.id = $1", SELECT_COPIES))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $2 WHERE id = $1")
            .bind(id)
            .bind(due_back)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }

        self.get_by_id(id).await
    }
}
