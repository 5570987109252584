//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Loan status of a copy, stored as a one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim().parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// A single loanable copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    /// Title of the catalogued book (joined)
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    /// User currently holding the copy
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    /// True when the copy is on loan to `user_id`
    pub fn is_borrowed_by(&self, user_id: i32) -> bool {
        self.status == LoanStatus::OnLoan && self.borrower_id == Some(user_id)
    }

    /// True when the due-back date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_back.is_some_and(|due| due < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy(status: LoanStatus, borrower_id: Option<i32>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: 1,
            book_title: "The Book".to_string(),
            imprint: "Unlikely Imprint, 2016".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 3, 10),
            status,
            borrower_id,
        }
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(status.code().parse::<LoanStatus>(), Ok(status));
        }
        assert!("x".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&LoanStatus::OnLoan).unwrap(), "\"on_loan\"");
    }

    #[test]
    fn borrowed_requires_loan_status_and_borrower() {
        assert!(copy(LoanStatus::OnLoan, Some(1)).is_borrowed_by(1));
        assert!(!copy(LoanStatus::OnLoan, Some(2)).is_borrowed_by(1));
        assert!(!copy(LoanStatus::Maintenance, Some(1)).is_borrowed_by(1));
        assert!(!copy(LoanStatus::OnLoan, None).is_borrowed_by(1));
    }

    #[test]
    fn overdue_is_strictly_after_due_date() {
        let c = copy(LoanStatus::OnLoan, Some(1));
        assert!(!c.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()));
        assert!(c.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));

        let undated = BookInstance { due_back: None, ..c };
        assert!(!undated.is_overdue(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }
}
