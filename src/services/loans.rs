//! Loan listing and renewal service

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    clock::Clock,
    error::AppResult,
    models::{BookInstance, LoanStatus},
    pagination::{Page, Paginator},
    renewal::{RenewBookForm, RenewalPolicy, RENEWAL_DATE_HELP_TEXT, RENEWAL_DATE_LABEL},
    repository::Repository,
};

/// Renewal form prepared for a copy
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalForm {
    pub copy: BookInstance,
    /// Proposed renewal date
    pub renewal_date: NaiveDate,
    /// Earliest acceptable date (today)
    pub min_date: NaiveDate,
    /// Latest acceptable date
    pub max_date: NaiveDate,
    pub label: String,
    pub help_text: String,
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    paginator: Paginator,
    policy: RenewalPolicy,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        paginator: Paginator,
        policy: RenewalPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            paginator,
            policy,
            clock,
        }
    }

    /// Copies on loan to `user_id`, earliest due first
    pub async fn list_borrowed_by(&self, user_id: i32, page: Option<i64>) -> AppResult<Page<BookInstance>> {
        let copies = self.repository.copies.list_borrowed_by(user_id).await?;
        let page = list_borrowed_by(user_id, copies, &self.paginator, page);
        tracing::debug!(
            "User {} has {} borrowed copies, page {}/{}",
            user_id,
            page.count,
            page.number,
            page.num_pages
        );
        Ok(page)
    }

    /// Every copy on loan, earliest due first
    pub async fn list_all_borrowed(&self, page: Option<i64>) -> AppResult<Page<BookInstance>> {
        let copies = self.repository.copies.list_on_loan().await?;
        let page = list_all_borrowed(copies, &self.paginator, page);
        tracing::debug!(
            "{} copies on loan, page {}/{}",
            page.count,
            page.number,
            page.num_pages
        );
        Ok(page)
    }

    /// Renewal form for a copy, pre-filled with the proposed date
    pub async fn renewal_form(&self, copy_id: Uuid) -> AppResult<RenewalForm> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        let today = self.clock.today();
        let initial = RenewBookForm::initial(&self.policy, today);

        Ok(RenewalForm {
            copy,
            renewal_date: initial.renewal_date,
            min_date: today,
            max_date: self.policy.latest(today),
            label: RENEWAL_DATE_LABEL.to_string(),
            help_text: RENEWAL_DATE_HELP_TEXT.to_string(),
        })
    }

    /// Validate the submitted date and store it as the copy's due-back date.
    ///
    /// Callers must have checked the librarian capability beforehand.
    pub async fn renew(&self, copy_id: Uuid, form: &RenewBookForm) -> AppResult<BookInstance> {
        self.repository.copies.get_by_id(copy_id).await?;

        let today = self.clock.today();
        let due_back = form.clean(&self.policy, today).map_err(|e| {
            tracing::warn!(
                "Rejected renewal of {} to {}: {}",
                copy_id,
                form.renewal_date,
                e
            );
            e
        })?;

        let copy = self.repository.copies.update_due_back(copy_id, due_back).await?;
        tracing::info!("Renewed copy {} until {}", copy_id, due_back);
        Ok(copy)
    }
}

/// Order copies by due-back date, undated copies last
pub fn sort_by_due_back(copies: &mut [BookInstance]) {
    copies.sort_by_key(|c| (c.due_back.is_none(), c.due_back));
}

/// Page of the copies on loan to `user_id`
pub fn list_borrowed_by(
    user_id: i32,
    copies: Vec<BookInstance>,
    paginator: &Paginator,
    page: Option<i64>,
) -> Page<BookInstance> {
    let mut borrowed: Vec<BookInstance> = copies
        .into_iter()
        .filter(|c| c.is_borrowed_by(user_id))
        .collect();
    sort_by_due_back(&mut borrowed);
    paginator.page(borrowed, page)
}

/// Page of every copy on loan
pub fn list_all_borrowed(
    copies: Vec<BookInstance>,
    paginator: &Paginator,
    page: Option<i64>,
) -> Page<BookInstance> {
    let mut borrowed: Vec<BookInstance> = copies
        .into_iter()
        .filter(|c| c.status == LoanStatus::OnLoan)
        .collect();
    sort_by_due_back(&mut borrowed);
    paginator.page(borrowed, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        error::AppError,
        repository::{MockAuthorRepository, MockCopyRepository},
    };
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// 30 copies in maintenance, odd ones lent to user 1, even ones to user 2
    fn thirty_copies() -> Vec<BookInstance> {
        (0..30)
            .map(|n| BookInstance {
                id: Uuid::new_v4(),
                book_id: 1,
                book_title: "Book Title".to_string(),
                imprint: "Unlikely Imprint, 2016".to_string(),
                due_back: Some(today() + Duration::days(n % 5)),
                status: LoanStatus::Maintenance,
                borrower_id: Some(if n % 2 == 1 { 1 } else { 2 }),
            })
            .collect()
    }

    fn service(copies: MockCopyRepository) -> LoansService {
        let repository = Repository {
            authors: Arc::new(MockAuthorRepository::new()),
            copies: Arc::new(copies),
        };
        LoansService::new(
            repository,
            Paginator::default(),
            RenewalPolicy::default(),
            Arc::new(FixedClock(today())),
        )
    }

    #[test]
    fn nothing_borrowed_while_no_copy_is_on_loan() {
        let paginator = Paginator::default();
        assert!(list_borrowed_by(1, thirty_copies(), &paginator, None).is_empty());
        assert!(list_borrowed_by(2, thirty_copies(), &paginator, None).is_empty());
    }

    #[test]
    fn only_own_loaned_copies_are_listed() {
        let mut copies = thirty_copies();
        for copy in copies.iter_mut().take(10) {
            copy.status = LoanStatus::OnLoan;
        }

        let page = list_borrowed_by(1, copies, &Paginator::default(), None);
        assert_eq!(page.len(), 5);
        for copy in &page.items {
            assert_eq!(copy.borrower_id, Some(1));
            assert_eq!(copy.status, LoanStatus::OnLoan);
        }
    }

    #[test]
    fn borrowed_copies_are_sorted_by_due_date() {
        let mut copies = thirty_copies();
        for copy in copies.iter_mut() {
            copy.status = LoanStatus::OnLoan;
        }

        let paginator = Paginator::default();
        let first = list_borrowed_by(1, copies.clone(), &paginator, Some(1));
        assert_eq!(first.count, 15);
        assert_eq!(first.len(), 10);
        let dates: Vec<_> = first.items.iter().map(|c| c.due_back).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);

        let second = list_borrowed_by(1, copies, &paginator, Some(2));
        assert_eq!(second.len(), 5);
        assert!(first.items.last().unwrap().due_back <= second.items[0].due_back);
    }

    #[test]
    fn undated_copies_sort_last() {
        let mut copies = thirty_copies();
        copies[1].due_back = None;
        for copy in copies.iter_mut() {
            copy.status = LoanStatus::OnLoan;
        }

        let page = list_borrowed_by(1, copies, &Paginator::default(), Some(2));
        assert_eq!(page.items.last().unwrap().due_back, None);
    }

    #[test]
    fn all_borrowed_includes_every_borrower() {
        let mut copies = thirty_copies();
        for copy in copies.iter_mut().take(12) {
            copy.status = LoanStatus::OnLoan;
        }

        let page = list_all_borrowed(copies, &Paginator::default(), Some(2));
        assert_eq!(page.count, 12);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn service_lists_all_borrowed_from_repository() {
        let mut copies = thirty_copies();
        for copy in copies.iter_mut().take(12) {
            copy.status = LoanStatus::OnLoan;
        }
        let on_loan: Vec<BookInstance> = copies.into_iter().take(12).collect();

        let mut repo = MockCopyRepository::new();
        repo.expect_list_on_loan()
            .times(1)
            .returning(move || Ok(on_loan.clone()));

        let page = service(repo).list_all_borrowed(Some(1)).await.unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.len(), 10);
        assert_eq!(page.num_pages, 2);
    }

    #[tokio::test]
    async fn renewal_form_proposes_three_weeks() {
        let copy = thirty_copies().remove(0);
        let id = copy.id;
        let mut repo = MockCopyRepository::new();
        repo.expect_get_by_id().returning(move |_| Ok(copy.clone()));

        let form = service(repo).renewal_form(id).await.unwrap();
        assert_eq!(form.renewal_date, today() + Duration::weeks(3));
        assert_eq!(form.min_date, today());
        assert_eq!(form.max_date, today() + Duration::weeks(4));
        assert_eq!(form.label, "renewal date");
    }

    #[tokio::test]
    async fn renew_stores_valid_date() {
        let copy = thirty_copies().remove(0);
        let id = copy.id;
        let new_date = today() + Duration::weeks(4);

        let mut repo = MockCopyRepository::new();
        let existing = copy.clone();
        repo.expect_get_by_id().returning(move |_| Ok(existing.clone()));
        repo.expect_update_due_back()
            .withf(move |copy_id, date| *copy_id == id && *date == new_date)
            .times(1)
            .returning(move |_, date| {
                Ok(BookInstance {
                    due_back: Some(date),
                    ..copy.clone()
                })
            });

        let form = RenewBookForm {
            renewal_date: new_date,
        };
        let renewed = service(repo).renew(id, &form).await.unwrap();
        assert_eq!(renewed.due_back, Some(new_date));
    }

    #[tokio::test]
    async fn renew_rejects_past_date_without_storing() {
        let copy = thirty_copies().remove(0);
        let id = copy.id;

        let mut repo = MockCopyRepository::new();
        repo.expect_get_by_id().returning(move |_| Ok(copy.clone()));
        repo.expect_update_due_back().never();

        let form = RenewBookForm {
            renewal_date: today() - Duration::days(1),
        };
        let result = service(repo).renew(id, &form).await;
        match result {
            Err(AppError::InvalidField { field, message }) => {
                assert_eq!(field, "renewal_date");
                assert_eq!(message, "Invalid date - renewal in past");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn renew_unknown_copy_is_not_found() {
        let mut repo = MockCopyRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Book instance {} not found", id))));
        repo.expect_update_due_back().never();

        let form = RenewBookForm {
            renewal_date: today(),
        };
        let result = service(repo).renew(Uuid::new_v4(), &form).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
