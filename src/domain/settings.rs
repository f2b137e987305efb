use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Daily card quota for tests or study sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardQuota {
  Limited(u32),
  Unlimited,
}

impl CardQuota {
  /// Maximum number of cards to take, `None` when unlimited.
  pub fn limit(&self) -> Option<usize> {
    match self {
      Self::Limited(n) => Some(*n as usize),
      Self::Unlimited => None,
    }
  }

  /// True when `count` has reached the quota.
  pub fn is_met_by(&self, count: usize) -> bool {
    match self {
      Self::Limited(n) => count >= *n as usize,
      Self::Unlimited => true,
    }
  }

  /// True when one more card still fits under the quota.
  pub fn admits(&self, count: usize) -> bool {
    !matches!(self, Self::Limited(n) if count >= *n as usize)
  }

  /// Converts the legacy integer setting, where any negative value meant "no limit".
  pub fn from_legacy(value: i64) -> Self {
    if value < 0 {
      Self::Unlimited
    } else {
      Self::Limited(value.min(u32::MAX as i64) as u32)
    }
  }
}

impl Default for CardQuota {
  fn default() -> Self {
    Self::Limited(10)
  }
}

impl Serialize for CardQuota {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Limited(n) => serializer.serialize_u32(*n),
      Self::Unlimited => serializer.serialize_str("unlimited"),
    }
  }
}

impl<'de> Deserialize<'de> for CardQuota {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      Number(i64),
      Text(String),
    }

    match Repr::deserialize(deserializer)? {
      Repr::Number(n) => Ok(CardQuota::from_legacy(n)),
      Repr::Text(s) if s.eq_ignore_ascii_case("unlimited") => Ok(CardQuota::Unlimited),
      Repr::Text(s) => Err(serde::de::Error::custom(format!("invalid card quota '{}'", s))),
    }
  }
}

/// Per-track study configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSettings {
  #[serde(default)]
  pub daily_test_cards: CardQuota,
  #[serde(default)]
  pub daily_study_cards: CardQuota,
  #[serde(default = "default_test_tries")]
  pub daily_test_tries: u32,
  #[serde(default)]
  pub use_examples: bool,
  #[serde(default)]
  pub use_notes: bool,
  #[serde(default)]
  pub writing_enabled: bool,
  #[serde(default)]
  pub listening_enabled: bool,
  #[serde(default)]
  pub failed_cards_priority: bool,
}

fn default_test_tries() -> u32 {
  3
}

impl Default for TrackSettings {
  fn default() -> Self {
    Self {
      daily_test_cards: CardQuota::default(),
      daily_study_cards: CardQuota::default(),
      daily_test_tries: default_test_tries(),
      use_examples: true,
      use_notes: true,
      writing_enabled: false,
      listening_enabled: false,
      failed_cards_priority: false,
    }
  }
}
