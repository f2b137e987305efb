use serde::{Deserialize, Serialize};

/// One of the four reviewable dimensions of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Skill {
  /// Recall the source-language term from the translation
  FromLanguage,
  /// Recall the translation from the source-language term
  ToLanguage,
  Listening,
  Writing,
}

impl Skill {
  pub const ALL: [Skill; 4] = [
    Skill::FromLanguage,
    Skill::ToLanguage,
    Skill::Listening,
    Skill::Writing,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FromLanguage => "fromLanguage",
      Self::ToLanguage => "toLanguage",
      Self::Listening => "listening",
      Self::Writing => "writing",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "fromLanguage" | "from_language" => Some(Self::FromLanguage),
      "toLanguage" | "to_language" => Some(Self::ToLanguage),
      "listening" => Some(Self::Listening),
      "writing" => Some(Self::Writing),
      _ => None,
    }
  }
}

impl std::fmt::Display for Skill {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One value per skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerSkill<T> {
  pub from_language: T,
  pub to_language: T,
  pub listening: T,
  pub writing: T,
}

impl<T> PerSkill<T> {
  pub fn from_fn(mut f: impl FnMut(Skill) -> T) -> Self {
    Self {
      from_language: f(Skill::FromLanguage),
      to_language: f(Skill::ToLanguage),
      listening: f(Skill::Listening),
      writing: f(Skill::Writing),
    }
  }

  pub fn get(&self, skill: Skill) -> &T {
    match skill {
      Skill::FromLanguage => &self.from_language,
      Skill::ToLanguage => &self.to_language,
      Skill::Listening => &self.listening,
      Skill::Writing => &self.writing,
    }
  }

  pub fn get_mut(&mut self, skill: Skill) -> &mut T {
    match skill {
      Skill::FromLanguage => &mut self.from_language,
      Skill::ToLanguage => &mut self.to_language,
      Skill::Listening => &mut self.listening,
      Skill::Writing => &mut self.writing,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (Skill, &T)> {
    Skill::ALL.into_iter().map(move |skill| (skill, self.get(skill)))
  }

  pub fn for_each_mut(&mut self, mut f: impl FnMut(Skill, &mut T)) {
    for skill in Skill::ALL {
      f(skill, self.get_mut(skill));
    }
  }
}
