//! Campaign duration from epoch timestamps.
//!
//! Both timestamps are reduced to their UTC calendar date before the
//! difference is taken, so the result counts date boundaries rather than
//! elapsed 24-hour periods: a campaign launched at 23:00 and closing at
//! 01:00 the next day lasts one day.

use chrono::{DateTime, NaiveDate};

/// UTC calendar date of an epoch timestamp in seconds.
///
/// Returns None when the timestamp is outside chrono's range.
pub fn epoch_to_date(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}

/// Whole days from launch date to deadline date.
///
/// Negative when the deadline date precedes the launch date.
pub fn days_between(launched: NaiveDate, deadline: NaiveDate) -> i64 {
    (deadline - launched).num_days()
}
