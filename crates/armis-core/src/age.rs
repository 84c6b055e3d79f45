//! Whole-years age from an optional date of birth.
//!
//! Ages are never an error: an absent, unreadable or future date simply makes
//! the age [`Age::Unavailable`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A non-negative number of whole years, or nothing.
///
/// Serialised as a number or `null`; displayed as the number or `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Age {
  Years(u32),
  Unavailable,
}

impl Age {
  /// Whole years between `dob` and `today`.
  pub fn on(dob: Option<NaiveDate>, today: NaiveDate) -> Self {
    dob
      .and_then(|d| today.years_since(d))
      .map_or(Self::Unavailable, Self::Years)
  }

  /// Same as [`Age::on`], for a date still in its stored text form.
  pub fn from_raw(raw: Option<&str>, today: NaiveDate) -> Self {
    Self::on(raw.and_then(parse_date), today)
  }

  /// Age as of the current UTC date.
  pub fn now(dob: Option<NaiveDate>) -> Self {
    Self::on(dob, Utc::now().date_naive())
  }

  pub fn years(self) -> Option<u32> {
    match self {
      Self::Years(n) => Some(n),
      Self::Unavailable => None,
    }
  }
}

impl fmt::Display for Age {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Years(n) => write!(f, "{n}"),
      Self::Unavailable => f.write_str("N/A"),
    }
  }
}

impl From<Option<u32>> for Age {
  fn from(years: Option<u32>) -> Self {
    years.map_or(Self::Unavailable, Self::Years)
  }
}

impl From<Age> for Option<u32> {
  fn from(age: Age) -> Self { age.years() }
}

/// Read a calendar date in any of the forms found in personnel data.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` and
/// `DD/MM/YYYY`. Anything else, including zero dates, is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let s = raw.trim();
  if s.is_empty() {
    return None;
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    .or_else(|| {
      NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
    })
    .or_else(|| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok())
}
