//! Per-card, per-skill review schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::repeat_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchedule {
  #[serde(with = "crate::domain::date")]
  pub due_date: NaiveDate,
  /// Consecutive successful reviews
  #[serde(default)]
  pub repeat_count: u32,
  #[serde(default)]
  pub test_quiz: bool,
  /// Failures over the card's lifetime
  #[serde(default)]
  pub lapses: u32,
}

impl CardSchedule {
  pub fn new(created: NaiveDate) -> Self {
    Self {
      due_date: created,
      repeat_count: 0,
      test_quiz: false,
      lapses: 0,
    }
  }

  pub fn is_due(&self, today: NaiveDate) -> bool {
    self.due_date == today
  }

  /// A missed review becomes due today; lateness never adds to the interval.
  pub fn roll_forward(&mut self, today: NaiveDate) {
    if self.due_date < today {
      self.due_date = today;
    }
  }

  pub fn on_outcome(&mut self, passed: bool, today: NaiveDate) {
    if passed {
      self.repeat_count = self.repeat_count.saturating_add(1);
    } else {
      self.repeat_count = 0;
      self.lapses = self.lapses.saturating_add(1);
    }
    self.due_date = repeat_date(today, self.repeat_count);
  }
}
