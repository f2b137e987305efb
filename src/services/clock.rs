//! Source of "today" for scheduling decisions.

use chrono::{Local, NaiveDate};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and manual date changes.
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        let mut guard = self.date.lock().unwrap_or_else(|e| e.into_inner());
        *guard = date;
    }

    pub fn advance_days(&self, days: u64) {
        let mut guard = self.date.lock().unwrap_or_else(|e| e.into_inner());
        *guard = *guard + chrono::Days::new(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.today(), start);

        clock.advance_days(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        clock.set(start);
        assert_eq!(clock.today(), start);
    }

    #[test]
    fn test_system_clock_matches_local_date() {
        let today = SystemClock.today();
        let local = Local::now().date_naive();
        assert!((local - today).num_days().abs() <= 1);
    }
}
