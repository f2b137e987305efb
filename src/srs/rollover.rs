//! Daily roll-forward of stale schedules and test states.
//!
//! Safe to run any number of times per day; it must run once after the date
//! changes before selections reflect the new day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Skill, Track};

/// Summary of one roll-forward pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverReport {
  pub tracks: usize,
  pub cards: usize,
  /// Card/skill schedules due today after the pass
  pub due_schedules: usize,
}

impl RolloverReport {
  pub fn merge(&mut self, other: RolloverReport) {
    self.tracks += other.tracks;
    self.cards += other.cards;
    self.due_schedules += other.due_schedules;
  }
}

/// Set every skill to Prepared or Missing from today's due counts.
pub fn recompute_missing(track: &mut Track, today: NaiveDate) {
  let quota = track.settings.daily_test_cards;
  for skill in Skill::ALL {
    let due = track.due_count(skill, today);
    track.test_state_mut(skill).recompute_missing(due, quota);
  }
}

pub fn roll_forward_track(track: &mut Track, today: NaiveDate) -> RolloverReport {
  let max_tries = track.settings.daily_test_tries;
  track
    .tests
    .for_each_mut(|_, state| state.roll_forward(today, max_tries));

  for card in &mut track.cards {
    card.roll_forward(today);
  }

  recompute_missing(track, today);

  RolloverReport {
    tracks: 1,
    cards: track.cards.len(),
    due_schedules: Skill::ALL.iter().map(|s| track.due_count(*s, today)).sum(),
  }
}

pub fn roll_forward_all<'a>(
  tracks: impl IntoIterator<Item = &'a mut Track>,
  today: NaiveDate,
) -> RolloverReport {
  let mut report = RolloverReport::default();
  for track in tracks {
    report.merge(roll_forward_track(track, today));
  }
  report
}
