//! Repository layer for catalog storage
//!
//! Services only see the traits below; `authors` and `copies` back the
//! server with Postgres, `memory` backs tests and local experiments.

pub mod authors;
pub mod copies;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, BookInstance},
};

/// Read access to authors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors in storage order
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Author>;
}

/// Access to book instances
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CopyRepository: Send + Sync {
    /// Copies currently on loan to `borrower_id`
    async fn list_borrowed_by(&self, borrower_id: i32) -> AppResult<Vec<BookInstance>>;

    /// Every copy currently on loan
    async fn list_on_loan(&self) -> AppResult<Vec<BookInstance>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance>;

    /// Store a new due-back date and return the updated copy
    async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub copies: Arc<dyn CopyRepository>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            copies: Arc::new(copies::CopiesRepository::new(pool)),
        }
    }

    /// Create a repository backed by an in-memory catalog
    pub fn in_memory(catalog: Arc<memory::InMemoryCatalog>) -> Self {
        Self {
            authors: catalog.clone(),
            copies: catalog,
        }
    }
}
