//! Cross-skill study batches and decoy answers.
//!
//! Every card due for at least one skill is a study candidate. Candidates are
//! split into a Retry bucket and a New bucket, each capped at the daily study
//! quota. A Retry candidate whose bucket is full takes a free New slot. Only
//! candidates that fit neither bucket go to an overflow pool (capped at twice
//! the quota) that callers can use as extra wrong answers.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::SchedulingError;
use crate::domain::{Card, CardQuota, Track};

/// Minimum batch size for the "can study" indicator
pub const MIN_STUDY_CARDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyBucket {
  New,
  Retry,
}

/// How a candidate is assigned to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudyCriterion {
  /// Retry when any of the card's skills has failed before
  #[default]
  FailureHistory,
  /// Retry when the card was not created today
  CreationDate,
}

/// How many decoys to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoyLimit {
  /// One decoy per card in the track
  #[default]
  FullTrack,
  AtMost(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StudyOptions {
  pub criterion: StudyCriterion,
  pub decoy_limit: DecoyLimit,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyBatch {
  pub cards: Vec<Card>,
  #[serde(rename = "fakeAnswers")]
  pub decoys: Vec<Card>,
  /// Due cards that did not fit the bucket quotas
  pub overflow: Vec<Card>,
}

pub fn classify(card: &Card, today: NaiveDate, criterion: StudyCriterion) -> StudyBucket {
  let retry = match criterion {
    StudyCriterion::FailureHistory => card.has_lapsed(),
    StudyCriterion::CreationDate => card.creation_date != today,
  };
  if retry { StudyBucket::Retry } else { StudyBucket::New }
}

pub fn select_study_batch(track: &Track, today: NaiveDate) -> Result<StudyBatch, SchedulingError> {
  select_study_batch_with(track, today, &StudyOptions::default())
}

pub fn select_study_batch_with(
  track: &Track,
  today: NaiveDate,
  options: &StudyOptions,
) -> Result<StudyBatch, SchedulingError> {
  let quota = track.settings.daily_study_cards;
  let overflow_cap = match quota {
    CardQuota::Limited(n) => Some(n as usize * 2),
    CardQuota::Unlimited => None,
  };

  let mut retry = Vec::new();
  let mut fresh = Vec::new();
  let mut overflow = Vec::new();

  for card in track.cards.iter().filter(|c| c.is_due_any(today)) {
    let bucket = classify(card, today, options.criterion);

    // A Retry card falls back to the New bucket when its own is full
    if bucket == StudyBucket::Retry && quota.admits(retry.len()) {
      retry.push(card.clone());
    } else if quota.admits(fresh.len()) {
      fresh.push(card.clone());
    } else if overflow_cap.is_none_or(|cap| overflow.len() < cap) {
      overflow.push(card.clone());
    } else if !quota.admits(retry.len()) {
      break;
    }
  }

  let cards: Vec<Card> = if track.settings.failed_cards_priority {
    retry.into_iter().chain(fresh).collect()
  } else {
    fresh.into_iter().chain(retry).collect()
  };

  if cards.is_empty() {
    return Err(SchedulingError::NoCardsToStudy);
  }

  tracing::debug!(
    track = %track.key,
    cards = cards.len(),
    overflow = overflow.len(),
    "Selected study batch"
  );

  Ok(StudyBatch {
    cards,
    decoys: generate_decoys(track, options.decoy_limit),
    overflow,
  })
}

/// Decoy copies of the track's cards, independent of any selection.
pub fn generate_decoys(track: &Track, limit: DecoyLimit) -> Vec<Card> {
  let take = match limit {
    DecoyLimit::FullTrack => track.cards.len(),
    DecoyLimit::AtMost(n) => n,
  };
  track.cards.iter().take(take).map(Card::decoy).collect()
}

pub fn can_study(track: &Track, today: NaiveDate) -> bool {
  select_study_batch(track, today).is_ok_and(|batch| batch.cards.len() >= MIN_STUDY_CARDS)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CardContent, Skill, TrackSettings};

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
  }

  fn track(study_cards: CardQuota) -> Track {
    let settings = TrackSettings {
      daily_study_cards: study_cards,
      ..TrackSettings::default()
    };
    Track::new("English", "French", settings)
  }

  fn push(track: &mut Track, created: NaiveDate, lapsed: bool) {
    let id = track.next_card_id();
    let mut card = Card::new(id, CardContent::new(format!("w{}", id), vec![format!("t{}", id)]), created);
    if lapsed {
      card.schedule_mut(Skill::Writing).lapses = 1;
    }
    track.cards.push(card);
  }

  fn ids(cards: &[Card]) -> Vec<i64> {
    cards.iter().map(|c| c.id).collect()
  }

  #[test]
  fn test_empty_track_has_nothing_to_study() {
    let t = track(CardQuota::Limited(5));
    assert!(matches!(
      select_study_batch(&t, day(1)),
      Err(SchedulingError::NoCardsToStudy)
    ));
  }

  #[test]
  fn test_nothing_due_has_nothing_to_study() {
    let mut t = track(CardQuota::Limited(5));
    push(&mut t, day(1), false);
    assert!(select_study_batch(&t, day(2)).is_err());
  }

  #[test]
  fn test_card_due_for_one_skill_is_candidate() {
    let mut t = track(CardQuota::Limited(5));
    push(&mut t, day(1), false);
    for skill in Skill::ALL {
      t.cards[0].schedule_mut(skill).due_date = day(9);
    }
    t.cards[0].schedule_mut(Skill::Listening).due_date = day(2);
    let batch = select_study_batch(&t, day(2)).unwrap();
    assert_eq!(ids(&batch.cards), vec![1]);
  }

  #[test]
  fn test_new_bucket_first_by_default() {
    let mut t = track(CardQuota::Limited(5));
    push(&mut t, day(1), true);
    push(&mut t, day(1), false);
    push(&mut t, day(1), true);
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(ids(&batch.cards), vec![2, 1, 3]);
  }

  #[test]
  fn test_failed_cards_priority_puts_retry_first() {
    let mut t = track(CardQuota::Limited(5));
    t.settings.failed_cards_priority = true;
    push(&mut t, day(1), false);
    push(&mut t, day(1), true);
    push(&mut t, day(1), false);
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(ids(&batch.cards), vec![2, 1, 3]);
  }

  #[test]
  fn test_bucket_quota_and_overflow_cap() {
    let mut t = track(CardQuota::Limited(2));
    for _ in 0..10 {
      push(&mut t, day(1), false);
    }
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(ids(&batch.cards), vec![1, 2]);
    assert_eq!(ids(&batch.overflow), vec![3, 4, 5, 6]);
  }

  #[test]
  fn test_each_bucket_has_its_own_quota() {
    let mut t = track(CardQuota::Limited(2));
    for i in 0..6 {
      push(&mut t, day(1), i % 2 == 0);
    }
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(batch.cards.len(), 4);
    assert_eq!(batch.overflow.len(), 2);
  }

  #[test]
  fn test_retry_card_takes_free_new_slot() {
    let mut t = track(CardQuota::Limited(1));
    t.settings.failed_cards_priority = true;
    push(&mut t, day(1), true);
    push(&mut t, day(1), true);
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(ids(&batch.cards), vec![1, 2]);
    assert!(batch.overflow.is_empty());
  }

  #[test]
  fn test_new_card_never_takes_retry_slot() {
    let mut t = track(CardQuota::Limited(1));
    push(&mut t, day(1), false);
    push(&mut t, day(1), false);
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(ids(&batch.cards), vec![1]);
    assert_eq!(ids(&batch.overflow), vec![2]);
  }

  #[test]
  fn test_overflow_only_when_both_buckets_full() {
    let mut t = track(CardQuota::Limited(1));
    for _ in 0..4 {
      push(&mut t, day(1), true);
    }
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(batch.cards.len(), 2);
    assert_eq!(ids(&batch.overflow), vec![3, 4]);
  }

  #[test]
  fn test_creation_date_criterion() {
    let mut t = track(CardQuota::Limited(5));
    t.settings.failed_cards_priority = true;
    push(&mut t, day(3), false);
    push(&mut t, day(1), false);
    for card in &mut t.cards {
      card.roll_forward(day(3));
    }
    let options = StudyOptions {
      criterion: StudyCriterion::CreationDate,
      ..StudyOptions::default()
    };
    let batch = select_study_batch_with(&t, day(3), &options).unwrap();
    assert_eq!(ids(&batch.cards), vec![2, 1]);
  }

  #[test]
  fn test_unlimited_study_quota_keeps_everything() {
    let mut t = track(CardQuota::Unlimited);
    for _ in 0..25 {
      push(&mut t, day(1), false);
    }
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(batch.cards.len(), 25);
    assert!(batch.overflow.is_empty());
  }

  #[test]
  fn test_decoys_cover_whole_track() {
    let mut t = track(CardQuota::Limited(1));
    for _ in 0..4 {
      push(&mut t, day(1), false);
    }
    t.cards[3].schedule_mut(Skill::FromLanguage).due_date = day(30);
    let batch = select_study_batch(&t, day(1)).unwrap();
    assert_eq!(batch.cards.len(), 1);
    assert_eq!(batch.decoys.len(), 4);
    assert_eq!(batch.decoys[0].content.term, "w1 Fake");
    assert_eq!(batch.decoys[0].content.translations, vec!["t1 Fake"]);
  }

  #[test]
  fn test_decoy_limit() {
    let mut t = track(CardQuota::Limited(1));
    for _ in 0..4 {
      push(&mut t, day(1), false);
    }
    assert_eq!(generate_decoys(&t, DecoyLimit::AtMost(2)).len(), 2);
    assert_eq!(generate_decoys(&t, DecoyLimit::AtMost(10)).len(), 4);
  }

  #[test]
  fn test_can_study_needs_three_cards() {
    let mut t = track(CardQuota::Limited(5));
    push(&mut t, day(1), false);
    push(&mut t, day(1), false);
    assert!(!can_study(&t, day(1)));
    push(&mut t, day(1), false);
    assert!(can_study(&t, day(1)));
  }

  #[test]
  fn test_quota_bounds_hold() {
    for quota in 1..4u32 {
      let mut t = track(CardQuota::Limited(quota));
      for i in 0..20 {
        push(&mut t, day(1), i % 3 == 0);
      }
      let batch = select_study_batch(&t, day(1)).unwrap();
      let fresh = batch.cards.iter().filter(|c| !c.has_lapsed()).count();
      assert!(fresh <= quota as usize);
      assert!(batch.cards.len() <= 2 * quota as usize);
      assert!(batch.overflow.len() <= 2 * quota as usize);
    }
  }
}
