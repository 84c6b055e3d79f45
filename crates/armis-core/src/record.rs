//! Personnel records as read from the personnel store.
//!
//! Every type here is an immutable snapshot taken at render time. Rows are
//! validated into these types at the storage boundary, so formatting code
//! never has to second-guess a missing column.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The unique identifier of a personnel record.
///
/// Surrounding whitespace is trimmed; a blank service number is rejected.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceNumber(String);

impl ServiceNumber {
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(Error::InvalidServiceNumber(raw.to_owned()));
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ServiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for ServiceNumber {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for ServiceNumber {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<ServiceNumber> for String {
  fn from(n: ServiceNumber) -> Self { n.0 }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// Personnel classification. Governs the display heading layout.
///
/// Parsing is case-insensitive and never fails: unrecognised categories are
/// preserved verbatim in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum Category {
  #[strum(serialize = "officer")]
  Officer,
  #[strum(
    serialize = "officer cadet",
    serialize = "officer_cadet",
    serialize = "officer-cadet"
  )]
  OfficerCadet,
  #[strum(serialize = "nco")]
  Nco,
  #[strum(serialize = "civilian")]
  Civilian,
  #[strum(default)]
  Other(String),
}

impl Category {
  pub fn parse(raw: &str) -> Self {
    let normalised = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    normalised
      .parse()
      .unwrap_or_else(|_| Self::Other(normalised.clone()))
  }

  /// The canonical lowercase spelling stored and displayed for this category.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Officer => "officer",
      Self::OfficerCadet => "officer cadet",
      Self::Nco => "nco",
      Self::Civilian => "civilian",
      Self::Other(s) => s,
    }
  }

  /// Equality for filtering. Unrecognised categories compare ignoring ASCII
  /// case, so `Reservist` finds rows stored as `reservist`.
  pub fn matches(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Other(a), Self::Other(b)) => a.eq_ignore_ascii_case(b),
      _ => self == other,
    }
  }

  /// Officers and officer cadets put their initials before the surname.
  pub fn is_commissioned(&self) -> bool {
    matches!(self, Self::Officer | Self::OfficerCadet)
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<String> for Category {
  fn from(s: String) -> Self { Self::parse(&s) }
}

impl From<Category> for String {
  fn from(c: Category) -> Self { c.as_str().to_owned() }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub email:   Option<String>,
  pub phone:   Option<String>,
  pub address: Option<String>,
}

/// A staff member's core profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
  pub service_number:  ServiceNumber,
  /// Given name; may hold several space-separated names.
  pub first_name:      String,
  pub last_name:       String,
  pub gender:          Option<String>,
  /// `None` when absent or stored in a form that could not be read.
  pub date_of_birth:   Option<NaiveDate>,
  /// Raw rank name, resolved to an abbreviation through [`RankInfo`].
  pub rank:            String,
  pub category:        Category,
  pub unit:            Option<String>,
  pub province:        Option<String>,
  pub contact:         Contact,
  pub enlistment_date: Option<NaiveDate>,
  pub intake:          Option<String>,
}

// ─── Rank ────────────────────────────────────────────────────────────────────

/// A rank name and the abbreviation used in display headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInfo {
  pub name:         String,
  pub abbreviation: String,
}

impl RankInfo {
  /// The rank used verbatim when the lookup table has no row for it.
  pub fn fallback(name: &str) -> Self {
    Self { name: name.to_owned(), abbreviation: name.to_owned() }
  }
}

// ─── Service history ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAttendance {
  pub course_id:        String,
  pub course_name:      Option<String>,
  pub institution_id:   String,
  pub institution_name: Option<String>,
  pub location:         Option<String>,
  pub start_date:       Option<NaiveDate>,
  pub end_date:         Option<NaiveDate>,
  pub result:           Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationParticipation {
  pub operation_id:   String,
  pub operation_name: Option<String>,
  pub operation_type: Option<String>,
  pub location:       Option<String>,
  pub start_date:     Option<NaiveDate>,
  pub end_date:       Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalAward {
  pub medal_id:    String,
  pub medal_name:  Option<String>,
  pub description: Option<String>,
  pub issue_date:  Option<NaiveDate>,
  /// The entity that authorised the award.
  pub authority:   Option<String>,
  pub comment:     Option<String>,
}

/// A history row ordered by one of its dates.
pub trait Dated {
  fn sort_date(&self) -> Option<NaiveDate>;
}

impl Dated for CourseAttendance {
  fn sort_date(&self) -> Option<NaiveDate> { self.start_date }
}

impl Dated for OperationParticipation {
  fn sort_date(&self) -> Option<NaiveDate> { self.start_date }
}

impl Dated for MedalAward {
  fn sort_date(&self) -> Option<NaiveDate> { self.issue_date }
}

/// Sort newest first. Rows with equal dates keep their relative order and
/// undated rows go last.
pub fn sort_newest_first<T: Dated>(rows: &mut [T]) {
  rows.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
}
