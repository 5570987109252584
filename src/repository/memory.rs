//! In-memory catalog storage

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, BookInstance, LoanStatus},
};

use super::{AuthorRepository, CopyRepository};

/// Authors and copies kept in insertion order
#[derive(Default)]
pub struct InMemoryCatalog {
    authors: RwLock<Vec<Author>>,
    copies: RwLock<Vec<BookInstance>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_author(&self, author: Author) {
        self.authors.write().await.push(author);
    }

    pub async fn insert_copy(&self, copy: BookInstance) {
        self.copies.write().await.push(copy);
    }

    /// All copies in insertion order, whatever their status
    pub async fn copies(&self) -> Vec<BookInstance> {
        self.copies.read().await.clone()
    }

    /// Apply `change` to the copy with the given id
    pub async fn update_copy<F>(&self, id: Uuid, change: F) -> AppResult<BookInstance>
    where
        F: FnOnce(&mut BookInstance),
    {
        let mut copies = self.copies.write().await;
        let copy = copies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        change(copy);
        Ok(copy.clone())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryCatalog {
    async fn list(&self) -> AppResult<Vec<Author>> {
        Ok(self.authors.read().await.clone())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.authors
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }
}

#[async_trait]
impl CopyRepository for InMemoryCatalog {
    async fn list_borrowed_by(&self, borrower_id: i32) -> AppResult<Vec<BookInstance>> {
        Ok(self
            .copies
            .read()
            .await
            .iter()
            .filter(|c| c.is_borrowed_by(borrower_id))
            .cloned()
            .collect())
    }

    async fn list_on_loan(&self) -> AppResult<Vec<BookInstance>> {
        Ok(self
            .copies
            .read()
            .await
            .iter()
            .filter(|c| c.status == LoanStatus::OnLoan)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        self.copies
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        self.update_copy(id, |c| c.due_back = Some(due_back)).await
    }
}
