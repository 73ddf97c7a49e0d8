//! Future-date axis generation.
//!
//! Forecast outputs are zipped positionally with a generated sequence of
//! future timestamps. The supported step frequencies mirror what the serving
//! layer requests: daily, weekly, bi-weekly, and month-end.
//!
//! Daily/weekly/bi-weekly stepping anchors on the caller's start date.
//! Month-end frequency yields the last calendar day of every month inside
//! the range.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Step frequency for a generated date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Every day
    Daily,
    /// Every 7 days from the start date
    Weekly,
    /// Every 14 days from the start date
    BiWeekly,
    /// The last calendar day of each month in the range
    MonthEnd,
}

/// Generate the dates in `[start, end]` at the given frequency.
///
/// Returns an empty vector when `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }

    match frequency {
        Frequency::Daily => step_days(start, end, 1),
        Frequency::Weekly => step_days(start, end, 7),
        Frequency::BiWeekly => step_days(start, end, 14),
        Frequency::MonthEnd => month_ends(start, end),
    }
}

fn step_days(start: NaiveDate, end: NaiveDate, step: u64) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current = match current.checked_add_days(Days::new(step)) {
            Some(next) => next,
            None => break,
        };
    }
    dates
}

fn month_ends(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut year = start.year();
    let mut month = start.month();

    loop {
        let last_day = last_day_of_month(year, month);
        if last_day > end {
            break;
        }
        if last_day >= start {
            dates.push(last_day);
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    dates
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always valid")
        .pred_opt()
        .expect("day before the first of a month is always valid")
}
