//! Business logic services

pub mod catalog;
pub mod loans;

use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::LoansConfig,
    pagination::Paginator,
    renewal::RenewalPolicy,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository, using the system clock
    pub fn new(repository: Repository, loans_config: &LoansConfig) -> Self {
        Self::with_clock(repository, loans_config, Arc::new(SystemClock))
    }

    /// Create all services reading "today" from `clock`
    pub fn with_clock(repository: Repository, loans_config: &LoansConfig, clock: Arc<dyn Clock>) -> Self {
        let paginator = Paginator::new(loans_config.page_size);
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), paginator),
            loans: loans::LoansService::new(
                repository,
                paginator,
                RenewalPolicy::from(loans_config),
                clock,
            ),
        }
    }
}
