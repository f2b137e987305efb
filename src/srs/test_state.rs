//! Daily test session state for one skill of a track.
//!
//! ```text
//!   Missing <-> Prepared          (recompute_missing)
//!      |           |
//!      +-----+-----+
//!            | fail, tries left
//!            v
//!          Tried --fail, last try--> Failed
//!            |
//!            +--pass--> Passed
//! ```
//!
//! Failed and Passed are terminal until the next day's roll-forward, which
//! also clears Tried and Prepared.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::SchedulingError;
use crate::domain::CardQuota;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
  #[default]
  Missing,
  Prepared,
  Tried,
  Failed,
  Passed,
}

impl TestStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Missing => "missing",
      Self::Prepared => "prepared",
      Self::Tried => "tried",
      Self::Failed => "failed",
      Self::Passed => "passed",
    }
  }

  /// No further attempts are accepted today
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Failed | Self::Passed)
  }

  /// A session has been started today
  pub fn is_in_session(&self) -> bool {
    matches!(self, Self::Tried | Self::Failed | Self::Passed)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTestState {
  pub status: TestStatus,
  pub daily_tries_remaining: u32,
  #[serde(default, with = "crate::domain::date::option")]
  pub last_fail_date: Option<NaiveDate>,
  #[serde(default, with = "crate::domain::date::option")]
  pub last_pass_date: Option<NaiveDate>,
  #[serde(default, with = "crate::domain::date::option")]
  pub last_try_date: Option<NaiveDate>,
}

impl SkillTestState {
  pub fn new(max_tries: u32) -> Self {
    Self {
      status: TestStatus::Missing,
      daily_tries_remaining: max_tries,
      last_fail_date: None,
      last_pass_date: None,
      last_try_date: None,
    }
  }

  /// Start-of-day transition.
  pub fn roll_forward(&mut self, today: NaiveDate, max_tries: u32) {
    let earlier = |date: Option<NaiveDate>| date.is_none_or(|d| d < today);

    let expired = match self.status {
      TestStatus::Missing => false,
      TestStatus::Prepared => {
        self.status = TestStatus::Missing;
        false
      }
      TestStatus::Passed => earlier(self.last_pass_date),
      TestStatus::Failed => earlier(self.last_fail_date),
      TestStatus::Tried => earlier(self.last_try_date),
    };

    if expired {
      self.status = TestStatus::Missing;
      self.daily_tries_remaining = max_tries;
    }
  }

  /// Refresh readiness from the number of cards due for this skill.
  /// Skills with a session already started today are left alone.
  pub fn recompute_missing(&mut self, due_count: usize, quota: CardQuota) {
    if self.status.is_in_session() {
      return;
    }
    // A zero quota with nothing due has nothing to prepare
    self.status = if due_count > 0 && quota.is_met_by(due_count) {
      TestStatus::Prepared
    } else {
      TestStatus::Missing
    };
  }

  pub fn apply_outcome(
    &mut self,
    passed: bool,
    today: NaiveDate,
    max_tries: u32,
  ) -> Result<TestStatus, SchedulingError> {
    if !passed && self.daily_tries_remaining == 0 {
      return Err(SchedulingError::TriesExhausted);
    }
    if self.status.is_terminal() {
      return Err(SchedulingError::AlreadyCompleted { status: self.status });
    }

    if passed {
      self.status = TestStatus::Passed;
      self.last_pass_date = Some(today);
      self.daily_tries_remaining = max_tries;
    } else {
      self.daily_tries_remaining -= 1;
      self.last_try_date = Some(today);
      if self.daily_tries_remaining == 0 {
        self.status = TestStatus::Failed;
        self.last_fail_date = Some(today);
      } else {
        self.status = TestStatus::Tried;
      }
    }
    Ok(self.status)
  }
}
