//! Card and settings edits that keep the track's test readiness current.

use chrono::NaiveDate;

use super::error::SchedulingError;
use super::rollover::recompute_missing;
use crate::domain::{Card, CardContent, CardId, Track, TrackSettings};

/// Reject content whose term matches an existing card.
pub fn verify_new_card(track: &Track, content: &CardContent) -> Result<(), SchedulingError> {
  let term = content.normalized_term();
  match track.cards.iter().find(|c| c.content.normalized_term() == term) {
    Some(existing) => Err(SchedulingError::DuplicateCard {
      existing_id: existing.id,
    }),
    None => Ok(()),
  }
}

/// Append a new card due today for every skill; returns its ID.
pub fn insert_card(track: &mut Track, content: CardContent, today: NaiveDate) -> CardId {
  let id = track.next_card_id();
  track.cards.push(Card::new(id, content, today));
  recompute_missing(track, today);
  tracing::debug!(track = %track.key, card_id = id, "Inserted card");
  id
}

/// Remove `old_id` and add `content` as a fresh card.
///
/// The replacement starts a new schedule, which is how edits that change
/// the term are applied.
pub fn replace_card(
  track: &mut Track,
  old_id: CardId,
  content: CardContent,
  today: NaiveDate,
) -> Result<CardId, SchedulingError> {
  remove(track, old_id)?;
  Ok(insert_card(track, content, today))
}

/// Edit display content in place; schedules are kept.
pub fn update_card_content(
  track: &mut Track,
  id: CardId,
  content: CardContent,
) -> Result<(), SchedulingError> {
  let card = track.card_mut(id).ok_or(SchedulingError::CardNotFound(id))?;
  card.content = content;
  Ok(())
}

pub fn delete_card(track: &mut Track, id: CardId, today: NaiveDate) -> Result<Card, SchedulingError> {
  let card = remove(track, id)?;
  recompute_missing(track, today);
  tracing::debug!(track = %track.key, card_id = id, "Deleted card");
  Ok(card)
}

pub fn update_settings(track: &mut Track, settings: TrackSettings, today: NaiveDate) {
  track.settings = settings;
  recompute_missing(track, today);
}

pub fn list_cards(track: &Track) -> Vec<Card> {
  track.cards_newest_first().cloned().collect()
}

fn remove(track: &mut Track, id: CardId) -> Result<Card, SchedulingError> {
  let pos = track
    .cards
    .iter()
    .position(|c| c.id == id)
    .ok_or(SchedulingError::CardNotFound(id))?;
  Ok(track.cards.remove(pos))
}
