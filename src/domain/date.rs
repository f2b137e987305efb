//! Calendar dates in the `YYYY.MM.DD` interchange form.
//!
//! Every date the scheduler stores or exchanges has day granularity. These
//! helpers are used both directly and as `#[serde(with = ...)]` adapters.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

pub const DATE_FORMAT: &str = "%Y.%m.%d";

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&format_date(*date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
  let s = String::deserialize(deserializer)?;
  parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

/// Adapter for optional dates; empty strings read as `None`.
pub mod option {
  use super::*;

  pub fn serialize<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match date {
      Some(d) => serializer.serialize_str(&format_date(*d)),
      None => serializer.serialize_str(""),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<NaiveDate>, D::Error> {
    let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if s.trim().is_empty() {
      return Ok(None);
    }
    parse_date(&s)
      .map(Some)
      .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
  }
}
