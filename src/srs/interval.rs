//! Fixed review-interval table.
//!
//! Indexed by the number of consecutive successful reviews. Counts past the
//! last entry stay on the final step.

use chrono::{Duration, NaiveDate};

/// Wait in days before the next review, by repeat count.
pub const INTERVAL_DAYS: [i64; 10] = [1, 1, 1, 3, 5, 7, 14, 30, 60, 240];

pub fn interval(repeat_count: u32) -> i64 {
  let idx = (repeat_count as usize).min(INTERVAL_DAYS.len() - 1);
  INTERVAL_DAYS[idx]
}

/// Date of the next review when the card has `repeat_count` successes behind it.
pub fn repeat_date(today: NaiveDate, repeat_count: u32) -> NaiveDate {
  today + Duration::days(interval(repeat_count))
}
