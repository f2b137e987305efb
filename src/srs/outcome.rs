use chrono::NaiveDate;
use serde::Serialize;

use super::error::SchedulingError;
use super::test_selector::ensure_enabled;
use super::test_state::TestStatus;
use crate::domain::{CardId, Skill, Track};

/// What a submitted test batch did to the skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
  pub status: TestStatus,
  pub daily_tries_remaining: u32,
  pub message: String,
}

impl OutcomeReport {
  fn new(status: TestStatus, daily_tries_remaining: u32) -> Self {
    let message = match status {
      TestStatus::Passed => "Test has been passed".to_string(),
      TestStatus::Failed => "Test is failed, try tomorrow".to_string(),
      _ => format!("Test is failed, {} tries left", daily_tries_remaining),
    };
    Self {
      status,
      daily_tries_remaining,
      message,
    }
  }
}

/// Record one test result for `skill` and update the listed cards.
///
/// A failed attempt that still leaves tries only touches the test state, so
/// the same cards stay due for the retry. Unknown card IDs are skipped.
pub fn apply_outcome(
  track: &mut Track,
  skill: Skill,
  card_ids: &[CardId],
  passed: bool,
  today: NaiveDate,
) -> Result<OutcomeReport, SchedulingError> {
  ensure_enabled(track, skill)?;

  let max_tries = track.settings.daily_test_tries;
  let state = track.test_state_mut(skill);
  let status = state.apply_outcome(passed, today, max_tries)?;
  let tries = state.daily_tries_remaining;

  if status != TestStatus::Tried {
    let mut updated = 0;
    for id in card_ids {
      if let Some(card) = track.card_mut(*id) {
        card.schedule_mut(skill).on_outcome(passed, today);
        updated += 1;
      }
    }
    if updated < card_ids.len() {
      tracing::debug!(
        track = %track.key,
        skipped = card_ids.len() - updated,
        "Ignored unknown card ids in test result"
      );
    }
  }

  tracing::info!(
    track = %track.key,
    skill = %skill,
    status = status.as_str(),
    tries_remaining = tries,
    "Applied test result"
  );

  Ok(OutcomeReport::new(status, tries))
}
