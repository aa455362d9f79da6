//! Membership period arithmetic
//!
//! # Month overflow
//!
//! `end_date` advances the calendar month and clamps the day to the last
//! valid day of the target month:
//!
//! | fee_date | months | end_date |
//! |----------|--------|----------|
//! | 2024-01-31 | 1 | 2024-02-29 |
//! | 2023-01-31 | 1 | 2023-02-28 |
//! | 2024-03-31 | 1 | 2024-04-30 |
//! | 2024-01-15 | 12 | 2025-01-15 |
//!
//! Status fields are derived from `end_date` and a caller-supplied "today"
//! and are never stored.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest membership period accepted (10 years)
pub const MAX_MONTHS: u32 = 120;

/// `fee_date` advanced by `months` calendar months, day clamped to month end
///
/// Returns `None` if the result is outside the representable date range.
pub fn end_date(fee_date: NaiveDate, months: u32) -> Option<NaiveDate> {
    fee_date.checked_add_months(Months::new(months))
}

/// Signed whole days from `today` to `end_date`
///
/// Both sides are calendar dates (midnight), so this is exact: 0 on the
/// last day, -1 the day after.
pub fn days_remaining(end_date: NaiveDate, today: NaiveDate) -> i64 {
    (end_date - today).num_days()
}

/// Derived membership state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub days_remaining: i64,
    pub is_overdue: bool,
    pub has_fee_due: bool,
}

impl MembershipStatus {
    pub fn compute(end_date: NaiveDate, fees_due: f64, today: NaiveDate) -> Self {
        let days_remaining = days_remaining(end_date, today);
        Self {
            days_remaining,
            is_overdue: days_remaining < 0,
            has_fee_due: fees_due > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn end_date_adds_calendar_months() {
        assert_eq!(end_date(d(2024, 1, 15), 1), Some(d(2024, 2, 15)));
        assert_eq!(end_date(d(2024, 1, 15), 12), Some(d(2025, 1, 15)));
        assert_eq!(end_date(d(2024, 11, 30), 3), Some(d(2025, 2, 28)));
    }

    #[test]
    fn end_date_clamps_to_month_end() {
        assert_eq!(end_date(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(end_date(d(2023, 1, 31), 1), Some(d(2023, 2, 28)));
        assert_eq!(end_date(d(2024, 3, 31), 1), Some(d(2024, 4, 30)));
        assert_eq!(end_date(d(2024, 2, 29), 12), Some(d(2025, 2, 28)));
    }

    #[test]
    fn end_date_overflow_is_none() {
        assert_eq!(end_date(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn days_remaining_boundaries() {
        let today = d(2024, 6, 10);
        assert_eq!(days_remaining(today, today), 0);
        assert_eq!(days_remaining(d(2024, 6, 11), today), 1);
        assert_eq!(days_remaining(d(2024, 6, 9), today), -1);
        assert_eq!(days_remaining(d(2024, 7, 10), today), 30);
    }

    #[test]
    fn overdue_exactly_when_negative() {
        let today = d(2024, 6, 10);
        assert!(!MembershipStatus::compute(today, 0.0, today).is_overdue);
        assert!(!MembershipStatus::compute(d(2024, 6, 11), 0.0, today).is_overdue);
        assert!(MembershipStatus::compute(d(2024, 6, 9), 0.0, today).is_overdue);
    }

    #[test]
    fn fee_due_flag() {
        let today = d(2024, 6, 10);
        assert!(MembershipStatus::compute(today, 0.01, today).has_fee_due);
        assert!(!MembershipStatus::compute(today, 0.0, today).has_fee_due);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let today = d(2024, 2, 1);
        let end = end_date(d(2024, 1, 31), 1).unwrap();
        let a = MembershipStatus::compute(end, 100.0, today);
        let b = MembershipStatus::compute(end, 100.0, today);
        assert_eq!(a, b);
        assert_eq!(a.days_remaining, 28);
    }
}
