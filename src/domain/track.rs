use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::settings::TrackSettings;
use super::skill::{PerSkill, Skill};
use crate::srs::SkillTestState;

/// Key of a track, derived from its language pair.
pub fn track_key(from_language: &str, to_language: &str) -> String {
  format!("{}-{}", from_language.trim(), to_language.trim())
}

/// A language pairing with its cards, per-skill test state and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
  pub key: String,
  pub from_language: String,
  pub to_language: String,
  /// Insertion order; the newest card is last
  #[serde(default)]
  pub cards: Vec<Card>,
  pub tests: PerSkill<SkillTestState>,
  pub settings: TrackSettings,
}

impl Track {
  pub fn new(from_language: &str, to_language: &str, settings: TrackSettings) -> Self {
    let tries = settings.daily_test_tries;
    Self {
      key: track_key(from_language, to_language),
      from_language: from_language.trim().to_string(),
      to_language: to_language.trim().to_string(),
      cards: Vec::new(),
      tests: PerSkill::from_fn(|_| SkillTestState::new(tries)),
      settings,
    }
  }

  /// Max existing ID + 1, or 1 for an empty track.
  pub fn next_card_id(&self) -> CardId {
    self.cards.iter().map(|c| c.id).max().map_or(1, |max| max + 1)
  }

  pub fn card(&self, id: CardId) -> Option<&Card> {
    self.cards.iter().find(|c| c.id == id)
  }

  pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
    self.cards.iter_mut().find(|c| c.id == id)
  }

  /// Cards for presentation, most recently created first.
  pub fn cards_newest_first(&self) -> impl Iterator<Item = &Card> {
    self.cards.iter().rev()
  }

  pub fn test_state(&self, skill: Skill) -> &SkillTestState {
    self.tests.get(skill)
  }

  pub fn test_state_mut(&mut self, skill: Skill) -> &mut SkillTestState {
    self.tests.get_mut(skill)
  }

  pub fn skill_enabled(&self, skill: Skill) -> bool {
    match skill {
      Skill::Listening => self.settings.listening_enabled,
      Skill::Writing => self.settings.writing_enabled,
      Skill::FromLanguage | Skill::ToLanguage => true,
    }
  }

  pub fn due_count(&self, skill: Skill, today: NaiveDate) -> usize {
    self.cards.iter().filter(|c| c.is_due(skill, today)).count()
  }
}
