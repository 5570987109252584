//! Renewal date rules for borrowed copies
//!
//! A librarian may push a copy's due-back date to any day between today and
//! the end of the renewal window (both inclusive). `today` is always passed
//! in by the caller so the rules stay deterministic.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::LoansConfig;

/// Label of the renewal date field
pub const RENEWAL_DATE_LABEL: &str = "renewal date";

/// Help text shown next to the renewal date field
pub const RENEWAL_DATE_HELP_TEXT: &str = "Enter a date between now and 4 weeks (default 3).";

/// Why a proposed renewal date was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalError {
    #[error("Invalid date - renewal in past")]
    PastDate,

    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarInFuture,
}

/// Renewal window and default proposal, in days from today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalPolicy {
    pub window_days: i64,
    pub default_days: i64,
}

impl Default for RenewalPolicy {
    fn default() -> Self {
        Self {
            window_days: 28,
            default_days: 21,
        }
    }
}

impl From<&LoansConfig> for RenewalPolicy {
    fn from(config: &LoansConfig) -> Self {
        Self {
            window_days: config.renewal_window_days,
            default_days: config.default_renewal_days,
        }
    }
}

impl RenewalPolicy {
    /// Check `candidate` against the window starting at `today`.
    ///
    /// Returns the date unchanged when accepted.
    pub fn validate(&self, candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
        if candidate < today {
            return Err(RenewalError::PastDate);
        }
        if candidate > self.latest(today) {
            return Err(RenewalError::TooFarInFuture);
        }
        Ok(candidate)
    }

    /// Last acceptable renewal date
    pub fn latest(&self, today: NaiveDate) -> NaiveDate {
        days_after(today, self.window_days)
    }

    /// Date proposed to the librarian before any input, never past `latest`
    pub fn proposed(&self, today: NaiveDate) -> NaiveDate {
        days_after(today, self.default_days).min(self.latest(today))
    }
}

/// `today` plus `days`, saturating at the calendar's end. Negative counts stay on `today`.
fn days_after(today: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days.max(0))
        .and_then(|delta| today.checked_add_signed(delta))
        .unwrap_or(NaiveDate::MAX)
}

/// Validate a renewal date with the standard four week window
pub fn validate_renewal_date(candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
    RenewalPolicy::default().validate(candidate, today)
}

/// Renewal form submitted by a librarian
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// New due-back date (ISO 8601)
    pub renewal_date: NaiveDate,
}

impl RenewBookForm {
    /// Form pre-filled with the policy's proposed date
    pub fn initial(policy: &RenewalPolicy, today: NaiveDate) -> Self {
        Self {
            renewal_date: policy.proposed(today),
        }
    }

    /// Return the cleaned renewal date, or the reason it was refused
    pub fn clean(&self, policy: &RenewalPolicy, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
        policy.validate(self.renewal_date, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn rejects_date_in_past() {
        let date = today() - Duration::days(1);
        assert_eq!(validate_renewal_date(date, today()), Err(RenewalError::PastDate));
    }

    #[test]
    fn rejects_date_too_far_in_future() {
        let date = today() + Duration::weeks(4) + Duration::days(1);
        assert_eq!(validate_renewal_date(date, today()), Err(RenewalError::TooFarInFuture));
    }

    #[test]
    fn accepts_today() {
        assert_eq!(validate_renewal_date(today(), today()), Ok(today()));
    }

    #[test]
    fn accepts_last_day_of_window() {
        let date = today() + Duration::weeks(4);
        assert_eq!(validate_renewal_date(date, today()), Ok(date));
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        let today = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        assert_eq!(validate_renewal_date(last, today), Ok(last));
        assert_eq!(
            validate_renewal_date(last + Duration::days(1), today),
            Err(RenewalError::TooFarInFuture)
        );
    }

    #[test]
    fn far_past_is_past_not_too_far() {
        let date = today() - Duration::days(400);
        assert_eq!(validate_renewal_date(date, today()), Err(RenewalError::PastDate));
    }

    #[test]
    fn initial_form_proposes_three_weeks() {
        let form = RenewBookForm::initial(&RenewalPolicy::default(), today());
        assert_eq!(form.renewal_date, today() + Duration::weeks(3));
        assert!(form.clean(&RenewalPolicy::default(), today()).is_ok());
    }

    #[test]
    fn custom_window_is_honored() {
        let policy = RenewalPolicy {
            window_days: 7,
            default_days: 7,
        };
        let form = RenewBookForm {
            renewal_date: today() + Duration::days(8),
        };
        assert_eq!(form.clean(&policy, today()), Err(RenewalError::TooFarInFuture));
    }

    #[test]
    fn huge_window_saturates_instead_of_overflowing() {
        let policy = RenewalPolicy {
            window_days: i64::MAX,
            default_days: i64::MAX,
        };
        assert_eq!(policy.latest(today()), NaiveDate::MAX);
        assert_eq!(policy.proposed(today()), NaiveDate::MAX);

        let far = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(policy.validate(far, today()), Ok(far));
        assert_eq!(
            policy.validate(today() - Duration::days(1), today()),
            Err(RenewalError::PastDate)
        );
    }

    #[test]
    fn negative_window_only_accepts_today() {
        let policy = RenewalPolicy {
            window_days: -5,
            default_days: 3,
        };
        assert_eq!(policy.latest(today()), today());
        assert_eq!(policy.proposed(today()), today());
        assert_eq!(
            policy.validate(today() + Duration::days(1), today()),
            Err(RenewalError::TooFarInFuture)
        );
    }

    #[test]
    fn form_field_label_and_help_text() {
        assert_eq!(RENEWAL_DATE_LABEL, "renewal date");
        assert_eq!(
            RENEWAL_DATE_HELP_TEXT,
            "Enter a date between now and 4 weeks (default 3)."
        );
    }

    #[test]
    fn form_deserializes_iso_date() {
        let form: RenewBookForm = serde_json::from_str(r#"{"renewal_date":"2024-04-01"}"#).unwrap();
        assert_eq!(form.renewal_date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }
}
