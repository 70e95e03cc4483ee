//! Calendar utilities for the sales_forecast crate

use chrono::{Datelike, Duration, NaiveDate};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // day 1 always exists
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// Add `n` whole months to a month-start date
pub fn add_months(month: NaiveDate, n: i32) -> NaiveDate {
    let zero_based = month.year() * 12 + month.month0() as i32 + n;
    let year = zero_based.div_euclid(12);
    let month0 = zero_based.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap()
}

/// Number of whole months from month-start `from` to month-start `to`
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() * 12 + to.month0() as i32) - (from.year() * 12 + from.month0() as i32)
}

/// Offset a date by a signed number of days
pub fn offset_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Month-start dates covering `[month_start(start), end]`, ascending
pub fn month_starts_in(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start(start);
    while current <= end {
        months.push(current);
        current = add_months(current, 1);
    }
    months
}
