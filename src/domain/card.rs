use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::skill::{PerSkill, Skill};
use crate::srs::CardSchedule;

pub type CardId = i64;

/// Suffix marking a decoy copy of a card
pub const DECOY_SUFFIX: &str = " Fake";

/// Display content of a card. The scheduler never looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
  pub term: String,
  #[serde(default)]
  pub translations: Vec<String>,
  #[serde(default)]
  pub examples: Vec<String>,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub pronunciation: Option<String>,
}

impl CardContent {
  pub fn new(term: impl Into<String>, translations: Vec<String>) -> Self {
    Self {
      term: term.into(),
      translations,
      ..Self::default()
    }
  }

  /// Term in the form used to detect duplicates: NFC, trimmed, lowercase.
  pub fn normalized_term(&self) -> String {
    self.term.trim().nfc().collect::<String>().to_lowercase()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  pub id: CardId,
  #[serde(flatten)]
  pub content: CardContent,
  #[serde(with = "crate::domain::date")]
  pub creation_date: NaiveDate,
  pub schedule: PerSkill<CardSchedule>,
}

impl Card {
  /// New card, due for every skill on its creation day.
  pub fn new(id: CardId, content: CardContent, created: NaiveDate) -> Self {
    Self {
      id,
      content,
      creation_date: created,
      schedule: PerSkill::from_fn(|_| CardSchedule::new(created)),
    }
  }

  pub fn schedule(&self, skill: Skill) -> &CardSchedule {
    self.schedule.get(skill)
  }

  pub fn schedule_mut(&mut self, skill: Skill) -> &mut CardSchedule {
    self.schedule.get_mut(skill)
  }

  pub fn is_due(&self, skill: Skill, today: NaiveDate) -> bool {
    self.schedule(skill).is_due(today)
  }

  pub fn is_due_any(&self, today: NaiveDate) -> bool {
    self.schedule.iter().any(|(_, s)| s.is_due(today))
  }

  /// True if any skill has ever failed a review of this card.
  pub fn has_lapsed(&self) -> bool {
    self.schedule.iter().any(|(_, s)| s.lapses > 0)
  }

  pub fn roll_forward(&mut self, today: NaiveDate) {
    self.schedule.for_each_mut(|_, s| s.roll_forward(today));
  }

  /// Copy with the term and last translation marked as wrong answers.
  pub fn decoy(&self) -> Card {
    let mut fake = self.clone();
    fake.content.term.push_str(DECOY_SUFFIX);
    if let Some(last) = fake.content.translations.last_mut() {
      last.push_str(DECOY_SUFFIX);
    }
    fake
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
  }

  fn sample() -> Card {
    Card::new(
      1,
      CardContent::new("apple", vec!["Яблуко".to_string(), "Яблучко".to_string()]),
      day(1),
    )
  }

  #[test]
  fn test_new_card_due_for_every_skill() {
    let card = sample();
    for skill in Skill::ALL {
      assert!(card.is_due(skill, day(1)));
      assert_eq!(card.schedule(skill).repeat_count, 0);
    }
    assert_eq!(card.creation_date, day(1));
  }

  #[test]
  fn test_is_due_any_single_skill() {
    let mut card = sample();
    for skill in Skill::ALL {
      card.schedule_mut(skill).due_date = day(5);
    }
    assert!(!card.is_due_any(day(2)));
    card.schedule_mut(Skill::Listening).due_date = day(2);
    assert!(card.is_due_any(day(2)));
  }

  #[test]
  fn test_roll_forward_all_skills() {
    let mut card = sample();
    card.schedule_mut(Skill::Writing).due_date = day(20);
    card.roll_forward(day(10));
    assert_eq!(card.schedule(Skill::FromLanguage).due_date, day(10));
    assert_eq!(card.schedule(Skill::Writing).due_date, day(20));
  }

  #[test]
  fn test_decoy_marks_term_and_last_translation() {
    let card = sample();
    let fake = card.decoy();
    assert_eq!(fake.content.term, "apple Fake");
    assert_eq!(fake.content.translations, vec!["Яблуко", "Яблучко Fake"]);
    // source card untouched
    assert_eq!(card.content.term, "apple");
    assert_eq!(card.content.translations[1], "Яблучко");
  }

  #[test]
  fn test_decoy_without_translations() {
    let card = Card::new(2, CardContent::new("pear", vec![]), day(1));
    let fake = card.decoy();
    assert_eq!(fake.content.term, "pear Fake");
    assert!(fake.content.translations.is_empty());
  }

  #[test]
  fn test_normalized_term() {
    let composed = CardContent::new("Café ", vec![]);
    let decomposed = CardContent::new("cafe\u{301}", vec![]);
    assert_eq!(composed.normalized_term(), decomposed.normalized_term());
  }

  #[test]
  fn test_has_lapsed() {
    let mut card = sample();
    assert!(!card.has_lapsed());
    card.schedule_mut(Skill::ToLanguage).on_outcome(false, day(1));
    assert!(card.has_lapsed());
  }

  #[test]
  fn test_card_serde_shape() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["term"], "apple");
    assert_eq!(json["creationDate"], "2024.04.01");
    assert_eq!(json["schedule"]["listening"]["dueDate"], "2024.04.01");
    let back: Card = serde_json::from_value(json).unwrap();
    assert_eq!(back, sample());
  }
}
