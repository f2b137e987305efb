use serde::{Deserialize, Serialize};

use super::track::Track;

pub type UserId = i64;

/// Profile fields only; credentials live outside this application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub username: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  #[serde(default)]
  pub email: String,
}

/// A user with the tracks they own. This is the unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: UserId,
  #[serde(flatten)]
  pub profile: UserProfile,
  #[serde(default)]
  pub tracks: Vec<Track>,
  /// Most recently used first
  #[serde(default)]
  pub track_keys: Vec<String>,
}

impl User {
  pub fn new(id: UserId, profile: UserProfile) -> Self {
    Self {
      id,
      profile,
      tracks: Vec::new(),
      track_keys: Vec::new(),
    }
  }
}

/// Move `key` to the front of a most-recently-used list.
pub fn touch_key(keys: &mut Vec<String>, key: &str) {
  keys.retain(|k| k != key);
  keys.insert(0, key.to_string());
}
