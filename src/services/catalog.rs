//! Catalog browsing service

use crate::{
    error::AppResult,
    models::Author,
    pagination::{Page, Paginator},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    paginator: Paginator,
}

impl CatalogService {
    pub fn new(repository: Repository, paginator: Paginator) -> Self {
        Self {
            repository,
            paginator,
        }
    }

    /// One page of authors, in storage order
    pub async fn list_authors(&self, page: Option<i64>) -> AppResult<Page<Author>> {
        let authors = self.repository.authors.list().await?;
        Ok(list_authors(authors, &self.paginator, page))
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }
}

/// Paginate authors without reordering them
pub fn list_authors(authors: Vec<Author>, paginator: &Paginator, page: Option<i64>) -> Page<Author> {
    paginator.page(authors, page)
}
