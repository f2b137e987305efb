use crate::domain::{CardId, Skill};

use super::test_state::TestStatus;

/// Recoverable scheduling failures, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
  /// The skill's test is already Failed or Passed for today
  AlreadyCompleted { status: TestStatus },
  /// No card is due for this skill
  NoneDue { status: TestStatus },
  NoCardsToStudy,
  /// A failing answer arrived after the day's tries ran out
  TriesExhausted,
  UnknownSkill(String),
  /// The skill is switched off in the track settings
  SkillDisabled(Skill),
  DuplicateCard { existing_id: CardId },
  CardNotFound(CardId),
}

impl std::fmt::Display for SchedulingError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SchedulingError::AlreadyCompleted { status } => {
        write!(f, "Test already completed today (status: {})", status.as_str())
      }
      SchedulingError::NoneDue { status } => {
        write!(f, "No cards due for testing (status: {})", status.as_str())
      }
      SchedulingError::NoCardsToStudy => write!(f, "There are no cards to study"),
      SchedulingError::TriesExhausted => write!(f, "No test tries left today"),
      SchedulingError::UnknownSkill(name) => write!(f, "Undefined test type: {}", name),
      SchedulingError::SkillDisabled(skill) => {
        write!(f, "The {} test isn't enabled for this track", skill)
      }
      SchedulingError::DuplicateCard { existing_id } => {
        write!(f, "Card already exists (id {})", existing_id)
      }
      SchedulingError::CardNotFound(id) => write!(f, "Card {} not found", id),
    }
  }
}

impl SchedulingError {
  /// Returns the message shown to the learner.
  pub fn user_message(&self) -> String {
    match self {
      SchedulingError::AlreadyCompleted { status: TestStatus::Failed } => {
        "Test is failed, try tomorrow".to_string()
      }
      SchedulingError::AlreadyCompleted { .. } => "Test has been passed".to_string(),
      SchedulingError::NoneDue { status: TestStatus::Prepared } => {
        "There are no cards to test today".to_string()
      }
      SchedulingError::NoneDue { status: TestStatus::Passed }
      | SchedulingError::NoneDue { status: TestStatus::Failed } => {
        "Come back tomorrow".to_string()
      }
      SchedulingError::NoneDue { .. } => "Nothing to test yet".to_string(),
      SchedulingError::TriesExhausted => "Test is failed".to_string(),
      other => other.to_string(),
    }
  }
}

impl std::error::Error for SchedulingError {}
