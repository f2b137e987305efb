use chrono::NaiveDate;

use super::error::SchedulingError;
use crate::domain::{Card, Skill, Track};

/// Reject skills switched off in the track settings.
pub fn ensure_enabled(track: &Track, skill: Skill) -> Result<(), SchedulingError> {
  if track.skill_enabled(skill) {
    Ok(())
  } else {
    Err(SchedulingError::SkillDisabled(skill))
  }
}

/// Cards due today for one skill, in storage order, up to the daily test quota.
///
/// Selection is read-only; the skill's status is unaffected.
pub fn select_test_batch(
  track: &Track,
  skill: Skill,
  today: NaiveDate,
) -> Result<Vec<Card>, SchedulingError> {
  ensure_enabled(track, skill)?;

  let status = track.test_state(skill).status;
  if status.is_terminal() {
    return Err(SchedulingError::AlreadyCompleted { status });
  }

  let due = track.cards.iter().filter(|c| c.is_due(skill, today));
  let cards: Vec<Card> = match track.settings.daily_test_cards.limit() {
    Some(max) => due.take(max).cloned().collect(),
    None => due.cloned().collect(),
  };

  if cards.is_empty() {
    return Err(SchedulingError::NoneDue { status });
  }

  tracing::debug!(
    track = %track.key,
    skill = %skill,
    count = cards.len(),
    "Selected test batch"
  );
  Ok(cards)
}
